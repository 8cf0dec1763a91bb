//! Command-line parsing for the net-zero tracker.
//!
//! Argument parsing and command dispatch stay separate from the analytics:
//! this module only describes the surface, `app` wires it to the pipeline.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::OutputMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nzt", version, about = "Grid CO2 net-zero goal tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate synthetic grid data into the configured stores.
    Simulate(SimulateArgs),
    /// Compute alignment, carbon budget, velocity and pathway indicators.
    Track(TrackArgs),
    /// Print descriptive statistics for each stored dataset.
    Summary(SourceArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimulateMode {
    /// Emit a single step at the current time.
    Once,
    /// Emit one step per wall-clock tick until interrupted.
    Continuous,
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[arg(value_enum, default_value_t = SimulateMode::Once)]
    pub mode: SimulateMode,

    /// Random seed for reproducible output (overrides SIM_RANDOM_SEED).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write records (overrides OUTPUT_MODE).
    #[arg(long, value_enum)]
    pub output: Option<OutputMode>,

    /// Wall-clock seconds between steps in continuous mode.
    #[arg(long)]
    pub wall: Option<u64>,

    /// Simulated minutes per step.
    #[arg(long)]
    pub step: Option<i64>,

    /// Stop a continuous run after this many steps.
    #[arg(long)]
    pub steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Csv,
    Supabase,
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    #[arg(long, value_enum, default_value_t = Source::Csv)]
    pub source: Source,

    /// Directory holding the CSV tables (overrides CSV_OUTPUT_DIR).
    #[arg(long, value_name = "DIR")]
    pub csvdir: Option<PathBuf>,

    /// Most recent rows to load per time series.
    #[arg(long, default_value_t = 1000)]
    pub limit: usize,

    /// Most recent rows to load from the yearly targets table.
    #[arg(long, default_value_t = 100)]
    pub targets_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BaseYear {
    /// Earliest year found in the data.
    Data,
    /// The current calendar year.
    Current,
}

#[derive(Debug, Clone, Args)]
pub struct TrackArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value_t = BaseYear::Data)]
    pub base_year: BaseYear,

    /// Evaluate as of this instant (RFC 3339) instead of the wall clock.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,

    /// Also write the result as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}
