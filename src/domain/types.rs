//! Shared domain types.
//!
//! Three groups live here:
//!
//! - raw rows as handed over by a data provider (`RawIntensityRow`, `RawGenerationRow`)
//! - normalized samples consumed by the analytics core (`IntensitySample`, `GenerationSample`)
//! - the goal-tracker output (`GoalTrackerOutcome` and its indicator records)
//!
//! Output types are serializable so a result can be exported to JSON and read
//! back by whatever renders it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A timestamp in one of the representations the normalizer accepts.
///
/// The set is closed on purpose: anything outside it is a malformed timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawTimestampRepr")]
pub enum RawTimestamp {
    /// ISO-8601 / RFC 3339 text, with or without an offset.
    Text(String),
    /// Seconds since the Unix epoch (fractional seconds allowed).
    Epoch(f64),
    /// Already a UTC instant.
    Utc(DateTime<Utc>),
    /// A naive instant, assumed to be UTC.
    Naive(NaiveDateTime),
    /// Anything else a provider sent (null, a boolean, an object, or nothing).
    /// Always malformed; the rendered value is kept for the drop report.
    Unsupported(String),
}

impl Default for RawTimestamp {
    /// A row without a `timestamp` field.
    fn default() -> Self {
        RawTimestamp::Unsupported("missing".to_string())
    }
}

/// Wire shape of a timestamp inside JSON rows: a number, a string, or any other value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestampRepr {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawTimestampRepr> for RawTimestamp {
    fn from(value: RawTimestampRepr) -> Self {
        match value {
            RawTimestampRepr::Number(secs) => RawTimestamp::Epoch(secs),
            RawTimestampRepr::Text(s) => RawTimestamp::Text(s),
            RawTimestampRepr::Other(v) => RawTimestamp::Unsupported(v.to_string()),
        }
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        RawTimestamp::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        RawTimestamp::Utc(value)
    }
}

/// A CO2-intensity row before timestamp normalization.
///
/// Field names follow the storage schema (`co2_intensity_g_per_kwh`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawIntensityRow {
    #[serde(default)]
    pub timestamp: RawTimestamp,
    #[serde(rename = "co2_intensity_g_per_kwh", default)]
    pub intensity_g_per_kwh: Option<f64>,
}

/// A generation-mix row before timestamp normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawGenerationRow {
    #[serde(default)]
    pub timestamp: RawTimestamp,
    #[serde(rename = "total_mw", default)]
    pub total_output_mw: Option<f64>,
    #[serde(flatten)]
    pub breakdown: SourceBreakdown,
}

/// Per-technology output in MW. Every field is optional; the goal tracker
/// ignores the breakdown and only the generation summary reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    #[serde(default)]
    pub hydro_mw: Option<f64>,
    #[serde(default)]
    pub wind_mw: Option<f64>,
    #[serde(default)]
    pub solar_mw: Option<f64>,
    #[serde(default)]
    pub nuclear_mw: Option<f64>,
    #[serde(default)]
    pub fossil_mw: Option<f64>,
}

impl SourceBreakdown {
    pub fn is_empty(&self) -> bool {
        self.hydro_mw.is_none()
            && self.wind_mw.is_none()
            && self.solar_mw.is_none()
            && self.nuclear_mw.is_none()
            && self.fossil_mw.is_none()
    }

    /// Hydro + wind + solar, if all three are present.
    pub fn renewable_mw(&self) -> Option<f64> {
        Some(self.hydro_mw? + self.wind_mw? + self.solar_mw?)
    }
}

/// A normalized CO2-intensity observation (g/kWh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensitySample {
    pub timestamp: DateTime<Utc>,
    pub intensity_g_per_kwh: f64,
}

/// A normalized generation observation (MW).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSample {
    pub timestamp: DateTime<Utc>,
    pub total_output_mw: f64,
    pub breakdown: Option<SourceBreakdown>,
}

/// One year of the net-zero trajectory. Masses are in megatonnes (Mt).
///
/// Any field missing from the source is `None`, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualTarget {
    pub year: i32,
    #[serde(default)]
    pub actual_emissions_mt: Option<f64>,
    #[serde(default)]
    pub target_emissions_mt: Option<f64>,
    #[serde(default)]
    pub alignment_pct: Option<f64>,
}

/// Year-to-date carbon budget with pace-of-spend projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonBudget {
    pub ytd_emitted_tons: f64,
    pub ytd_budget_tons: f64,
    /// Positive: under budget by this many days of average emissions.
    /// Negative: over budget.
    pub days_ahead: f64,
}

/// Observed vs required decarbonization rate, in g/kWh per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Positive when intensity is falling.
    pub actual_rate: f64,
    pub required_rate: f64,
    pub on_track: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub year: i32,
    pub target_tons: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub eta_year: Option<i32>,
    #[serde(default)]
    pub target_series: Vec<TargetPoint>,
}

/// Which branch chose the base year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseYearSource {
    /// Earliest year in the annual-targets dataset.
    Targets,
    /// Earliest year across both time series (no targets supplied).
    Series,
    /// The current calendar year (data-derived base year disabled).
    CurrentYear,
}

/// Values the indicators were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerContext {
    pub current_year: i32,
    pub base_year: i32,
    pub base_year_source: BaseYearSource,
    pub latest_intensity: f64,
    pub base_intensity: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_intensity: Option<f64>,
}

/// Sparse goal-tracker result: every indicator is independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTrackerResult {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alignment_index_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub budget: Option<CarbonBudget>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub velocity: Option<Velocity>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pathway: Option<Pathway>,
    pub context: TrackerContext,
}

/// Either the whole result collapsed to "insufficient data", or a computed result.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalTrackerOutcome {
    InsufficientData,
    Computed(GoalTrackerResult),
}

impl GoalTrackerOutcome {
    pub fn result(&self) -> Option<&GoalTrackerResult> {
        match self {
            GoalTrackerOutcome::InsufficientData => None,
            GoalTrackerOutcome::Computed(result) => Some(result),
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, GoalTrackerOutcome::InsufficientData)
    }
}

pub const INSUFFICIENT_DATA_MARKER: &str = "insufficient_data";

impl Serialize for GoalTrackerOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GoalTrackerOutcome::InsufficientData => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", INSUFFICIENT_DATA_MARKER)?;
                map.end()
            }
            GoalTrackerOutcome::Computed(result) => result.serialize(serializer),
        }
    }
}
