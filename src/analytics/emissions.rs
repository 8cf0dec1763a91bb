//! Emissions integration and carbon-budget pacing.
//!
//! Generation (MW) and intensity (g/kWh) arrive on independent, possibly
//! irregular cadences. Integration joins each generation sample to the nearest
//! intensity sample within a tolerance, weights it by the time since the
//! previous matched sample, and sums the resulting mass:
//!
//! ```text
//! mwh  = output_mw * elapsed_hours
//! tons = mwh * g_per_kwh * 0.001      (1 MWh = 1000 kWh, 1000 g = 1 kg, 1000 kg = 1 t)
//! ```

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::domain::{GenerationSample, IntensitySample};
use crate::math::median;
use crate::series::sort_by_timestamp;

/// Maximum distance between a generation sample and its intensity match.
pub const MATCH_TOLERANCE_MINUTES: i64 = 20;

/// Interval assigned to the first matched sample when no other interval exists.
pub const FALLBACK_INTERVAL_HOURS: f64 = 0.25;

/// Fewer matched samples than this cannot be integrated.
pub const MIN_MATCHED_SAMPLES: usize = 2;

const DAYS_PER_BUDGET_YEAR: f64 = 365.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Jan 1 00:00 UTC of `year` up to Jan 1 of the following year.
    pub fn calendar_year(year: i32) -> Option<Self> {
        Some(Self {
            start: start_of_year(year)?,
            end: start_of_year(year.checked_add(1)?)?,
        })
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

pub fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

pub fn match_tolerance() -> Duration {
    Duration::minutes(MATCH_TOLERANCE_MINUTES)
}

/// Where the first matched sample's interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstInterval {
    /// Median of the other positive intervals in the window.
    MedianOfWindow,
    /// No positive interval existed; `FALLBACK_INTERVAL_HOURS` was used.
    Fallback,
}

/// One generation sample joined to its intensity match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedSample {
    pub timestamp: DateTime<Utc>,
    pub output_mw: f64,
    pub intensity_g_per_kwh: f64,
    pub elapsed_hours: f64,
    pub energy_mwh: f64,
    pub emitted_tons: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionsIntegral {
    pub total_tons: f64,
    pub total_mwh: f64,
    pub first_interval: FirstInterval,
    /// Matched samples in ascending time order.
    pub samples: Vec<MatchedSample>,
    /// Generation samples inside the window that found no intensity match.
    pub unmatched: usize,
}

/// Nearest sample to `at` within `tolerance` (inclusive). `sorted` must be ascending.
///
/// When two candidates are equally close, the earlier one wins.
pub fn nearest_within(
    sorted: &[IntensitySample],
    at: DateTime<Utc>,
    tolerance: Duration,
) -> Option<&IntensitySample> {
    let idx = sorted.partition_point(|s| s.timestamp < at);
    let before = idx.checked_sub(1).and_then(|i| sorted.get(i));
    let after = sorted.get(idx);

    let best = match (before, after) {
        (Some(b), Some(a)) => {
            if at - b.timestamp <= a.timestamp - at {
                b
            } else {
                a
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };

    ((best.timestamp - at).abs() <= tolerance).then_some(best)
}

/// Integrate emitted mass over `window`.
///
/// Inputs may be in any order; neither slice is modified. Returns `None` when
/// fewer than `MIN_MATCHED_SAMPLES` generation samples find a match.
pub fn integrate_emissions(
    generation: &[GenerationSample],
    intensity: &[IntensitySample],
    window: TimeWindow,
) -> Option<EmissionsIntegral> {
    let mut intensity_sorted = intensity.to_vec();
    sort_by_timestamp(&mut intensity_sorted);

    let mut in_window: Vec<GenerationSample> = generation
        .iter()
        .copied()
        .filter(|g| window.contains(g.timestamp))
        .collect();
    sort_by_timestamp(&mut in_window);

    let tolerance = match_tolerance();
    let mut joined: Vec<(DateTime<Utc>, f64, f64)> = Vec::with_capacity(in_window.len());
    let mut unmatched = 0usize;
    for g in &in_window {
        match nearest_within(&intensity_sorted, g.timestamp, tolerance) {
            Some(m) => joined.push((g.timestamp, g.total_output_mw, m.intensity_g_per_kwh)),
            None => unmatched += 1,
        }
    }

    if joined.len() < MIN_MATCHED_SAMPLES {
        return None;
    }

    let mut hours: Vec<f64> = Vec::with_capacity(joined.len());
    hours.push(0.0);
    for pair in joined.windows(2) {
        hours.push(hours_between(pair[0].0, pair[1].0));
    }

    let positive: Vec<f64> = hours[1..].iter().copied().filter(|h| *h > 0.0).collect();
    let first_interval = match median(&positive) {
        Some(step) => {
            hours[0] = step;
            FirstInterval::MedianOfWindow
        }
        None => {
            hours[0] = FALLBACK_INTERVAL_HOURS;
            FirstInterval::Fallback
        }
    };

    let samples: Vec<MatchedSample> = joined
        .iter()
        .zip(&hours)
        .map(|(&(timestamp, output_mw, intensity_g_per_kwh), &elapsed_hours)| {
            let energy_mwh = output_mw * elapsed_hours;
            MatchedSample {
                timestamp,
                output_mw,
                intensity_g_per_kwh,
                elapsed_hours,
                energy_mwh,
                emitted_tons: energy_mwh * intensity_g_per_kwh * 1e-3,
            }
        })
        .collect();

    Some(EmissionsIntegral {
        total_tons: samples.iter().map(|s| s.emitted_tons).sum(),
        total_mwh: samples.iter().map(|s| s.energy_mwh).sum(),
        first_interval,
        samples,
        unmatched,
    })
}

fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let delta = b - a;
    (delta.num_milliseconds() as f64 / 1_000.0) / SECONDS_PER_HOUR
}

/// Year-to-date budget position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetPacing {
    pub ytd_emitted_tons: f64,
    pub ytd_budget_tons: f64,
    pub elapsed_days: f64,
    pub daily_average_tons: f64,
    pub days_ahead: f64,
}

/// Fractional days since Jan 1 00:00 UTC of `now`'s year, floored at 1 day.
pub fn elapsed_days_since_jan1(now: DateTime<Utc>) -> f64 {
    let days = start_of_year(now.year())
        .map(|jan1| (now - jan1).num_milliseconds() as f64 / 1_000.0 / SECONDS_PER_DAY)
        .unwrap_or(1.0);
    days.max(1.0)
}

/// Compare emitted mass against a linear share of the annual target.
///
/// `days_ahead` is how many days of average emissions remain before the
/// proportional budget is reached (negative when already over). A zero or
/// negative daily average reports exactly `0.0`.
pub fn pace_budget(annual_target_tons: f64, ytd_emitted_tons: f64, elapsed_days: f64) -> BudgetPacing {
    let elapsed_days = elapsed_days.max(1.0);
    let ytd_budget_tons = annual_target_tons * (elapsed_days / DAYS_PER_BUDGET_YEAR);
    let daily_average_tons = ytd_emitted_tons / elapsed_days;
    let days_ahead = if daily_average_tons > 0.0 {
        (ytd_budget_tons - ytd_emitted_tons) / daily_average_tons
    } else {
        0.0
    };

    BudgetPacing {
        ytd_emitted_tons,
        ytd_budget_tons,
        elapsed_days,
        daily_average_tons,
        days_ahead,
    }
}
