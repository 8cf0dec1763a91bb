//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw provider rows and the closed set of timestamp representations
//! - normalized samples (`IntensitySample`, `GenerationSample`, `AnnualTarget`)
//! - goal-tracker outputs (`GoalTrackerOutcome`, `GoalTrackerResult`, ...)
//! - persistence records written by the simulator (`records`)

pub mod records;
pub mod types;

pub use records::*;
pub use types::*;
