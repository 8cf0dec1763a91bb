//! Shared load -> normalize -> compute workflow behind `track` and `summary`.
//!
//! The provider decides where rows come from; everything after the fetch is
//! identical for the CSV and REST stores.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::analytics::summary::{Co2Summary, GenerationSummary, NetZeroSummary};
use crate::analytics::{
    compute_goal_tracker, compute_goal_tracker_at, summarize_co2, summarize_generation, summarize_netzero,
};
use crate::data::DatasetProvider;
use crate::domain::{AnnualTarget, GenerationSample, GoalTrackerOutcome, IntensitySample};
use crate::error::AppError;
use crate::series::{DroppedRecord, normalize_generation, normalize_intensity};

/// Row limits for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    pub series: usize,
    pub targets: usize,
}

/// Normalized inputs for the analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerInputs {
    pub intensity: Vec<IntensitySample>,
    pub generation: Vec<GenerationSample>,
    pub targets: Vec<AnnualTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOutput {
    pub co2: Co2Summary,
    pub generation: GenerationSummary,
    pub netzero: NetZeroSummary,
}

pub fn load_inputs(provider: &dyn DatasetProvider, limits: LoadLimits) -> Result<TrackerInputs, AppError> {
    let intensity_rows = provider.fetch_intensity(limits.series)?;
    let generation_rows = provider.fetch_generation(limits.series)?;
    let targets = provider.fetch_targets(limits.targets)?;

    let intensity = normalize_intensity(&intensity_rows)?;
    log_dropped("co2_intensity", &intensity.dropped);
    let generation = normalize_generation(&generation_rows)?;
    log_dropped("generation_mix", &generation.dropped);

    info!(
        intensity = intensity.samples.len(),
        generation = generation.samples.len(),
        targets = targets.len(),
        "loaded inputs"
    );

    Ok(TrackerInputs {
        intensity: intensity.samples,
        generation: generation.samples,
        targets,
    })
}

/// Load, normalize and evaluate the tracker; `now` pins the clock when given.
pub fn run_tracker(
    provider: &dyn DatasetProvider,
    limits: LoadLimits,
    use_data_derived_base_year: bool,
    now: Option<DateTime<Utc>>,
) -> Result<GoalTrackerOutcome, AppError> {
    let inputs = load_inputs(provider, limits)?;
    let outcome = match now {
        Some(now) => compute_goal_tracker_at(
            &inputs.intensity,
            &inputs.generation,
            &inputs.targets,
            use_data_derived_base_year,
            now,
        ),
        None => compute_goal_tracker(
            &inputs.intensity,
            &inputs.generation,
            &inputs.targets,
            use_data_derived_base_year,
        ),
    };
    Ok(outcome)
}

pub fn run_summary(provider: &dyn DatasetProvider, limits: LoadLimits) -> Result<SummaryOutput, AppError> {
    let inputs = load_inputs(provider, limits)?;
    Ok(SummaryOutput {
        co2: summarize_co2(&inputs.intensity),
        generation: summarize_generation(&inputs.generation),
        netzero: summarize_netzero(&inputs.targets),
    })
}

fn log_dropped(dataset: &str, dropped: &[DroppedRecord]) {
    for d in dropped {
        warn!(dataset, index = d.index, "dropped record: {}", d.reason);
    }
}
