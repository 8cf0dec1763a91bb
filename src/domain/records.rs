//! Persistence records written by the simulator.
//!
//! Field names are the storage column names; the CSV header and the REST
//! payload keys are derived from them, so renaming a field changes the schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2IntensityRecord {
    /// Assigned by the table store; `None` for freshly simulated rows.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub co2_intensity_g_per_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMixRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub hydro_mw: f64,
    pub wind_mw: f64,
    pub solar_mw: f64,
    pub nuclear_mw: f64,
    pub fossil_mw: f64,
    pub total_mw: f64,
    pub renewable_share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetZeroAlignmentRecord {
    pub year: i32,
    pub actual_emissions_mt: f64,
    pub target_emissions_mt: f64,
    pub alignment_pct: f64,
}

/// Column names of each table, in record field order.
pub const CO2_COLUMNS: [&str; 2] = ["timestamp", "co2_intensity_g_per_kwh"];

pub const GENERATION_COLUMNS: [&str; 8] = [
    "timestamp",
    "hydro_mw",
    "wind_mw",
    "solar_mw",
    "nuclear_mw",
    "fossil_mw",
    "total_mw",
    "renewable_share_pct",
];

pub const NETZERO_COLUMNS: [&str; 4] = [
    "year",
    "actual_emissions_mt",
    "target_emissions_mt",
    "alignment_pct",
];
