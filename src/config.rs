//! Runtime configuration read from the environment (and an optional `.env`).
//!
//! Configuration is resolved once at the edge of the program and handed to the
//! collaborators that need it; the analytics core never reads it.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use chrono_tz::Tz;
use clap::ValueEnum;
use tracing::warn;

use crate::error::AppError;

pub const DEFAULT_CSV_DIR: &str = "data";
pub const DEFAULT_WALL_INTERVAL_SECONDS: u64 = 5;
pub const DEFAULT_STEP_MINUTES: i64 = 15;

/// Where simulated records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    #[default]
    Csv,
    Supabase,
    Both,
}

impl OutputMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "supabase" => Some(Self::Supabase),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn writes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn writes_supabase(self) -> bool {
        matches!(self, Self::Supabase | Self::Both)
    }
}

/// Table names and store locations shared by the simulator and the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub table_co2_intensity: String,
    pub table_generation_mix: String,
    pub table_netzero_alignment: String,
    pub csv_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            table_co2_intensity: "co2_intensity".to_string(),
            table_generation_mix: "generation_mix".to_string(),
            table_netzero_alignment: "netzero_alignment".to_string(),
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            supabase_url: non_empty("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            supabase_key: non_empty("SUPABASE_KEY"),
            table_co2_intensity: non_empty("TABLE_CO2_INTENSITY").unwrap_or(defaults.table_co2_intensity),
            table_generation_mix: non_empty("TABLE_GENERATION_MIX").unwrap_or(defaults.table_generation_mix),
            table_netzero_alignment: non_empty("TABLE_NETZERO_ALIGNMENT")
                .unwrap_or(defaults.table_netzero_alignment),
            csv_dir: non_empty("CSV_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.csv_dir),
        }
    }

    pub fn supabase_enabled(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }
}

/// Zone used to derive the local hour of day for the demand and solar profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimTimezone {
    Fixed(FixedOffset),
    /// IANA zone; local hours follow its DST rules.
    Named(Tz),
}

impl SimTimezone {
    pub fn utc() -> Self {
        Self::Fixed(utc())
    }

    /// `UTC`, a fixed `+HH:MM` / `-HH:MM` offset, or an IANA name such as `Europe/Dublin`.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(offset) = parse_utc_offset(raw) {
            return Some(Self::Fixed(offset));
        }
        raw.trim().parse::<Tz>().ok().map(Self::Named)
    }

    pub fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        match self {
            Self::Fixed(offset) => ts.with_timezone(offset).hour(),
            Self::Named(tz) => ts.with_timezone(tz).hour(),
        }
    }
}

impl Default for SimTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub timezone: SimTimezone,
    pub wall_interval_seconds: u64,
    pub step_minutes: i64,
    pub random_seed: Option<u64>,
    pub output_mode: OutputMode,
    pub store: StoreConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            timezone: SimTimezone::utc(),
            wall_interval_seconds: DEFAULT_WALL_INTERVAL_SECONDS,
            step_minutes: DEFAULT_STEP_MINUTES,
            random_seed: None,
            output_mode: OutputMode::Csv,
            store: StoreConfig::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timezone = match non_empty("SIM_TIMEZONE") {
            Some(raw) => SimTimezone::parse(&raw).unwrap_or_else(|| {
                warn!(timezone = %raw, "unknown SIM_TIMEZONE, falling back to UTC");
                SimTimezone::utc()
            }),
            None => SimTimezone::utc(),
        };

        let wall_interval_seconds = match non_empty("SIM_WALL_INTERVAL_SECONDS")
            .or_else(|| non_empty("WALL_INTERVAL_SECONDS"))
        {
            Some(raw) => parse_number("SIM_WALL_INTERVAL_SECONDS", &raw)?,
            None => DEFAULT_WALL_INTERVAL_SECONDS,
        };

        let step_minutes: i64 = match non_empty("SIM_STEP_MINUTES").or_else(|| non_empty("STEP_MINUTES")) {
            Some(raw) => parse_number("SIM_STEP_MINUTES", &raw)?,
            None => DEFAULT_STEP_MINUTES,
        };
        if step_minutes <= 0 {
            return Err(AppError::config("SIM_STEP_MINUTES must be > 0."));
        }

        let random_seed = non_empty("SIM_RANDOM_SEED")
            .map(|raw| parse_number("SIM_RANDOM_SEED", &raw))
            .transpose()?;

        let output_mode = match non_empty("OUTPUT_MODE") {
            Some(raw) => OutputMode::parse(&raw).ok_or_else(|| {
                AppError::config(format!("Invalid OUTPUT_MODE '{raw}' (expected csv, supabase or both)."))
            })?,
            None => OutputMode::Csv,
        };

        Ok(Self {
            timezone,
            wall_interval_seconds,
            step_minutes,
            random_seed,
            output_mode,
            store: StoreConfig::from_lookup(&lookup),
        })
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::config(format!("Invalid {key} value '{raw}'.")))
}

/// `UTC`, `Z`, or a fixed `+HH:MM` / `-HH:MM` offset.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return Some(utc());
    }

    let (sign, rest) = match trimmed.as_bytes().first()? {
        b'+' => (1, &trimmed[1..]),
        b'-' => (-1, &trimmed[1..]),
        _ => return None,
    };
    let (hh, mm) = rest.split_once(':')?;
    if hh.len() != 2 || mm.len() != 2 {
        return None;
    }
    let hours: i32 = hh.parse().ok()?;
    let minutes: i32 = mm.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}
