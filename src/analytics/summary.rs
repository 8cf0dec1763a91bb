//! Descriptive summaries of each stored dataset.

use serde::Serialize;

use crate::domain::{AnnualTarget, GenerationSample, IntensitySample};
use crate::math::mean;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Co2Summary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_g_per_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_g_per_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_g_per_kwh: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_total_mw: Option<f64>,
    /// Mean over samples with a full hydro/wind/solar breakdown and non-zero total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_renewable_share_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetZeroSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_alignment_pct: Option<f64>,
}

pub fn summarize_co2(samples: &[IntensitySample]) -> Co2Summary {
    let values: Vec<f64> = samples.iter().map(|s| s.intensity_g_per_kwh).collect();
    Co2Summary {
        count: values.len(),
        min_g_per_kwh: values.iter().copied().reduce(f64::min),
        max_g_per_kwh: values.iter().copied().reduce(f64::max),
        avg_g_per_kwh: mean(&values),
    }
}

pub fn summarize_generation(samples: &[GenerationSample]) -> GenerationSummary {
    let totals: Vec<f64> = samples.iter().map(|s| s.total_output_mw).collect();
    let shares: Vec<f64> = samples
        .iter()
        .filter(|s| s.total_output_mw != 0.0)
        .filter_map(|s| {
            let renewable = s.breakdown?.renewable_mw()?;
            Some(100.0 * renewable / s.total_output_mw)
        })
        .collect();

    GenerationSummary {
        count: samples.len(),
        avg_total_mw: mean(&totals),
        avg_renewable_share_pct: mean(&shares),
    }
}

/// Alignment of the latest year that reports one.
pub fn summarize_netzero(targets: &[AnnualTarget]) -> NetZeroSummary {
    let latest = targets
        .iter()
        .filter_map(|t| t.alignment_pct.filter(|a| a.is_finite()).map(|a| (t.year, a)))
        .fold(None, |best: Option<(i32, f64)>, (year, pct)| match best {
            Some((y, _)) if y >= year => best,
            _ => Some((year, pct)),
        });

    NetZeroSummary {
        count: targets.len(),
        latest_year: latest.map(|(year, _)| year),
        latest_alignment_pct: latest.map(|(_, pct)| pct),
    }
}
