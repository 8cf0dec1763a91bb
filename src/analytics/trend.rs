//! Trailing-window linear trend.
//!
//! Given a series sorted by time, take every sample within `window` of the most
//! recent one and fit `value = a + b * elapsed_days`. Elapsed time is measured
//! from the window's own first timestamp, never from the Unix epoch, so the
//! regressor stays small and well conditioned.

use chrono::{DateTime, Duration, Utc};

use crate::math::fit_line;

/// Default trailing window for the decarbonization trend.
pub const TREND_WINDOW_DAYS: i64 = 7;

/// Minimum samples inside the window; below this there is no estimate at all.
pub const MIN_TREND_SAMPLES: usize = 10;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    /// Value units per day.
    pub slope_per_day: f64,
    /// Fitted value at `window_start`.
    pub intercept: f64,
    pub n_samples: usize,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

pub fn default_trend_window() -> Duration {
    Duration::days(TREND_WINDOW_DAYS)
}

/// The suffix of `sorted` whose timestamps are `>= latest - window`.
pub fn trailing_window<T>(sorted: &[(DateTime<Utc>, T)], window: Duration) -> &[(DateTime<Utc>, T)] {
    let Some((latest, _)) = sorted.last() else {
        return sorted;
    };
    let cutoff = *latest - window;
    let start = sorted.partition_point(|(ts, _)| *ts < cutoff);
    &sorted[start..]
}

/// Fit a line over the trailing window of an ascending series.
///
/// Returns `None` when the window holds fewer than `min_samples` samples or all
/// of them share one instant.
pub fn fit_trailing_trend(
    sorted: &[(DateTime<Utc>, f64)],
    window: Duration,
    min_samples: usize,
) -> Option<TrendFit> {
    let windowed = trailing_window(sorted, window);
    if windowed.len() < min_samples.max(2) {
        return None;
    }

    let window_start = windowed.iter().map(|(ts, _)| *ts).min()?;
    let window_end = windowed.iter().map(|(ts, _)| *ts).max()?;

    let points: Vec<(f64, f64)> = windowed
        .iter()
        .map(|(ts, value)| (elapsed_days(window_start, *ts), *value))
        .collect();

    let (intercept, slope_per_day) = fit_line(&points)?;

    Some(TrendFit {
        slope_per_day,
        intercept,
        n_samples: windowed.len(),
        window_start,
        window_end,
    })
}

fn elapsed_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    // Whole seconds plus the sub-second remainder keeps millisecond cadences exact.
    delta.num_seconds() as f64 / SECONDS_PER_DAY
        + f64::from(delta.subsec_nanos()) / 1e9 / SECONDS_PER_DAY
}
