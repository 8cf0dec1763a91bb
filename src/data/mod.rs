//! Data access seams.
//!
//! - `DatasetProvider`: where the tracker reads raw rows from
//! - `RecordSink`: where the simulator writes new records
//! - `supabase`: PostgREST table store over HTTP
//! - `simulate`: synthetic grid data generator

use crate::domain::{
    AnnualTarget, Co2IntensityRecord, GenerationMixRecord, NetZeroAlignmentRecord, RawGenerationRow,
    RawIntensityRow,
};
use crate::error::AppError;

pub mod simulate;
pub mod supabase;

/// Reads the most recent `limit` rows of each dataset.
pub trait DatasetProvider {
    fn fetch_intensity(&self, limit: usize) -> Result<Vec<RawIntensityRow>, AppError>;
    fn fetch_generation(&self, limit: usize) -> Result<Vec<RawGenerationRow>, AppError>;
    fn fetch_targets(&self, limit: usize) -> Result<Vec<AnnualTarget>, AppError>;
}

/// Persists simulated records. Targets are keyed by year; a year already stored is left untouched.
pub trait RecordSink {
    fn write_co2(&self, records: &[Co2IntensityRecord]) -> Result<(), AppError>;
    fn write_generation(&self, records: &[GenerationMixRecord]) -> Result<(), AppError>;
    fn upsert_targets(&self, records: &[NetZeroAlignmentRecord]) -> Result<(), AppError>;
}
