//! Net-zero goal tracker.
//!
//! Combines the three normalized datasets into four independent indicators:
//! alignment index, year-to-date carbon budget, decarbonization velocity and
//! pathway. Each indicator is dropped on its own when its inputs are missing;
//! only an empty intensity or generation series collapses the whole result.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::analytics::emissions::{
    TimeWindow, elapsed_days_since_jan1, integrate_emissions, pace_budget, start_of_year,
};
use crate::analytics::trend::{MIN_TREND_SAMPLES, default_trend_window, fit_trailing_trend};
use crate::domain::{
    AnnualTarget, BaseYearSource, CarbonBudget, GenerationSample, GoalTrackerOutcome,
    GoalTrackerResult, IntensitySample, Pathway, TargetPoint, TrackerContext, Velocity,
};
use crate::math::{median, round_to};
use crate::series::sort_by_timestamp;

pub const NET_ZERO_YEAR: i32 = 2050;
pub const TONS_PER_MEGATON: f64 = 1e6;

const DAYS_PER_YEAR: f64 = 365.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Compute the tracker against the current wall clock.
pub fn compute_goal_tracker(
    intensity: &[IntensitySample],
    generation: &[GenerationSample],
    targets: &[AnnualTarget],
    use_data_derived_base_year: bool,
) -> GoalTrackerOutcome {
    compute_goal_tracker_at(intensity, generation, targets, use_data_derived_base_year, Utc::now())
}

/// Compute the tracker as of `now`. Pure: identical inputs give identical output.
pub fn compute_goal_tracker_at(
    intensity: &[IntensitySample],
    generation: &[GenerationSample],
    targets: &[AnnualTarget],
    use_data_derived_base_year: bool,
    now: DateTime<Utc>,
) -> GoalTrackerOutcome {
    if intensity.is_empty() || generation.is_empty() {
        debug!(
            intensity = intensity.len(),
            generation = generation.len(),
            "goal tracker: empty series, insufficient data"
        );
        return GoalTrackerOutcome::InsufficientData;
    }

    let mut intensity_sorted = intensity.to_vec();
    sort_by_timestamp(&mut intensity_sorted);
    let Some(latest) = intensity_sorted.last() else {
        return GoalTrackerOutcome::InsufficientData;
    };
    let latest_intensity = latest.intensity_g_per_kwh;
    let latest_at = latest.timestamp;

    let current_year = now.year();
    let (base_year, base_year_source) =
        select_base_year(&intensity_sorted, generation, targets, use_data_derived_base_year, current_year);

    let base_intensity = base_year_intensity(&intensity_sorted, base_year).unwrap_or(latest_intensity);
    let annual_target_tons = target_tons_for(targets, current_year);
    let target_intensity = match (annual_target_tons, base_year_actual_tons(targets, base_year)) {
        (Some(target_tons), Some(actual_tons)) => Some(base_intensity * target_tons / actual_tons),
        (None, _) => {
            debug!(current_year, "no target for the current year; target intensity undefined");
            None
        }
        (_, None) => {
            debug!(base_year, "no positive base-year actual; target intensity undefined");
            None
        }
    };

    let alignment_index_pct = alignment_index(target_intensity, latest_intensity);

    let budget = match annual_target_tons {
        Some(annual) => carbon_budget(generation, &intensity_sorted, annual, current_year, now),
        None => {
            debug!("budget omitted: no current-year target");
            None
        }
    };

    let velocity = match target_intensity {
        Some(target) => decarbonization_velocity(&intensity_sorted, latest_intensity, latest_at, target, current_year),
        None => {
            debug!("velocity omitted: target intensity undefined");
            None
        }
    };

    let pathway = pathway(velocity.as_ref(), latest_intensity, current_year, targets);

    GoalTrackerOutcome::Computed(GoalTrackerResult {
        alignment_index_pct,
        budget,
        velocity,
        pathway,
        context: TrackerContext {
            current_year,
            base_year,
            base_year_source,
            latest_intensity,
            base_intensity,
            target_intensity,
        },
    })
}

fn select_base_year(
    intensity: &[IntensitySample],
    generation: &[GenerationSample],
    targets: &[AnnualTarget],
    use_data_derived_base_year: bool,
    current_year: i32,
) -> (i32, BaseYearSource) {
    if !use_data_derived_base_year {
        return (current_year, BaseYearSource::CurrentYear);
    }
    if let Some(year) = targets.iter().map(|t| t.year).min() {
        return (year, BaseYearSource::Targets);
    }
    let earliest = intensity
        .iter()
        .map(|s| s.timestamp.year())
        .chain(generation.iter().map(|s| s.timestamp.year()))
        .min();
    match earliest {
        Some(year) => (year, BaseYearSource::Series),
        None => (current_year, BaseYearSource::CurrentYear),
    }
}

fn base_year_intensity(sorted: &[IntensitySample], base_year: i32) -> Option<f64> {
    let values: Vec<f64> = sorted
        .iter()
        .filter(|s| s.timestamp.year() == base_year)
        .map(|s| s.intensity_g_per_kwh)
        .collect();
    median(&values)
}

/// Target mass for `year` in tons; the first record carrying a target wins.
fn target_tons_for(targets: &[AnnualTarget], year: i32) -> Option<f64> {
    targets
        .iter()
        .filter(|t| t.year == year)
        .find_map(|t| t.target_emissions_mt.filter(|mt| mt.is_finite()))
        .map(|mt| mt * TONS_PER_MEGATON)
}

fn base_year_actual_tons(targets: &[AnnualTarget], base_year: i32) -> Option<f64> {
    targets
        .iter()
        .filter(|t| t.year == base_year)
        .find_map(|t| t.actual_emissions_mt.filter(|mt| mt.is_finite()))
        .map(|mt| mt * TONS_PER_MEGATON)
        .filter(|tons| *tons > 0.0)
}

fn alignment_index(target_intensity: Option<f64>, latest_intensity: f64) -> Option<f64> {
    let target = target_intensity?;
    if latest_intensity <= 0.0 {
        debug!(latest_intensity, "alignment omitted: latest intensity is not positive");
        return None;
    }
    Some(round_to(100.0 * target / latest_intensity, 1))
}

fn carbon_budget(
    generation: &[GenerationSample],
    intensity_sorted: &[IntensitySample],
    annual_target_tons: f64,
    current_year: i32,
    now: DateTime<Utc>,
) -> Option<CarbonBudget> {
    let window = TimeWindow::calendar_year(current_year)?;
    let Some(integral) = integrate_emissions(generation, intensity_sorted, window) else {
        debug!(current_year, "budget omitted: fewer than two matched samples this year");
        return None;
    };
    let pacing = pace_budget(annual_target_tons, integral.total_tons, elapsed_days_since_jan1(now));
    Some(CarbonBudget {
        ytd_emitted_tons: pacing.ytd_emitted_tons,
        ytd_budget_tons: pacing.ytd_budget_tons,
        days_ahead: pacing.days_ahead,
    })
}

fn decarbonization_velocity(
    sorted: &[IntensitySample],
    latest_intensity: f64,
    latest_at: DateTime<Utc>,
    target_intensity: f64,
    current_year: i32,
) -> Option<Velocity> {
    if sorted.len() < MIN_TREND_SAMPLES {
        debug!(samples = sorted.len(), "velocity omitted: too few intensity samples");
        return None;
    }

    let series: Vec<(DateTime<Utc>, f64)> =
        sorted.iter().map(|s| (s.timestamp, s.intensity_g_per_kwh)).collect();
    let Some(fit) = fit_trailing_trend(&series, default_trend_window(), MIN_TREND_SAMPLES) else {
        debug!("velocity omitted: trailing window too sparse for a trend");
        return None;
    };

    let actual_rate = -fit.slope_per_day * DAYS_PER_YEAR;
    let year_end = start_of_year(current_year + 1)?;
    let days_left =
        ((year_end - latest_at).num_milliseconds() as f64 / 1_000.0 / SECONDS_PER_DAY).max(1.0);
    let required_rate = ((latest_intensity - target_intensity) * DAYS_PER_YEAR / days_left).max(0.0);

    Some(Velocity {
        actual_rate,
        required_rate,
        on_track: actual_rate >= required_rate,
    })
}

fn pathway(
    velocity: Option<&Velocity>,
    latest_intensity: f64,
    current_year: i32,
    targets: &[AnnualTarget],
) -> Option<Pathway> {
    let eta_year = velocity
        .filter(|v| v.actual_rate > 0.0)
        .map(|v| eta_year(current_year, latest_intensity, v.actual_rate));
    let target_series = target_series(targets);

    if eta_year.is_none() && target_series.is_empty() {
        debug!("pathway omitted: no eta and no target series");
        return None;
    }
    Some(Pathway { eta_year, target_series })
}

fn eta_year(current_year: i32, latest_intensity: f64, actual_rate: f64) -> i32 {
    let years = (latest_intensity / actual_rate).max(0.0);
    (f64::from(current_year) + years).floor() as i32
}

/// Ascending yearly targets in tons, first record per year wins, closed at net zero.
pub fn target_series(targets: &[AnnualTarget]) -> Vec<TargetPoint> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for t in targets {
        if let Some(mt) = t.target_emissions_mt.filter(|mt| mt.is_finite()) {
            by_year.entry(t.year).or_insert(mt * TONS_PER_MEGATON);
        }
    }
    if by_year.is_empty() {
        return Vec::new();
    }
    by_year.entry(NET_ZERO_YEAR).or_insert(0.0);

    by_year
        .into_iter()
        .map(|(year, target_tons)| TargetPoint { year, target_tons })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn target(year: i32, actual: Option<f64>, target: Option<f64>) -> AnnualTarget {
        AnnualTarget {
            year,
            actual_emissions_mt: actual,
            target_emissions_mt: target,
            alignment_pct: None,
        }
    }

    fn targets() -> Vec<AnnualTarget> {
        vec![
            target(2020, Some(31.0), Some(30.0)),
            target(2025, None, Some(25.0)),
        ]
    }

    /// Three base-year samples (median 400) plus `n` hourly samples ending at
    /// 2025-06-15 11:00 that fall by 1 g/kWh per day down to 300.
    fn intensity(n: i64) -> Vec<IntensitySample> {
        let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        let mut out: Vec<IntensitySample> = [390.0, 400.0, 410.0]
            .iter()
            .enumerate()
            .map(|(i, v)| IntensitySample {
                timestamp: base + Duration::hours(i as i64),
                intensity_g_per_kwh: *v,
            })
            .collect();
        let last = Utc.with_ymd_and_hms(2025, 6, 15, 11, 0, 0).unwrap();
        for h in 0..n {
            let hours_before_last = n - 1 - h;
            out.push(IntensitySample {
                timestamp: last - Duration::hours(hours_before_last),
                intensity_g_per_kwh: 300.0 + hours_before_last as f64 / 24.0,
            });
        }
        out
    }

    fn generation_at(intensity: &[IntensitySample], mw: f64) -> Vec<GenerationSample> {
        intensity
            .iter()
            .filter(|s| s.timestamp.year() == 2025)
            .map(|s| GenerationSample {
                timestamp: s.timestamp,
                total_output_mw: mw,
                breakdown: None,
            })
            .collect()
    }

    fn computed(outcome: &GoalTrackerOutcome) -> &GoalTrackerResult {
        outcome.result().expect("expected a computed result")
    }

    #[test]
    fn full_dataset_produces_every_indicator() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let result = computed(&outcome);

        assert_eq!(result.context.base_year, 2020);
        assert_eq!(result.context.base_year_source, BaseYearSource::Targets);
        assert!((result.context.base_intensity - 400.0).abs() < 1e-9);
        assert!((result.context.latest_intensity - 300.0).abs() < 1e-9);

        // I_target = 400 * 25 / 31 = 322.58; 100 * 322.58 / 300 = 107.5
        assert_eq!(result.alignment_index_pct, Some(107.5));

        let budget = result.budget.unwrap();
        // 48 hourly samples at 1000 MW: sum of intensities in tons.
        assert!((budget.ytd_emitted_tons - 14_447.0).abs() < 1e-6, "{}", budget.ytd_emitted_tons);
        let elapsed = 165.5;
        assert!((budget.ytd_budget_tons - 25e6 * elapsed / 365.0).abs() < 1e-3);
        assert!(budget.days_ahead > 0.0);

        let velocity = result.velocity.unwrap();
        assert!((velocity.actual_rate - 365.0).abs() < 1e-6, "{}", velocity.actual_rate);
        assert_eq!(velocity.required_rate, 0.0);
        assert!(velocity.on_track);

        let pathway = result.pathway.as_ref().unwrap();
        // 2025 + 300 / 365 years
        assert_eq!(pathway.eta_year, Some(2025));
        let years: Vec<i32> = pathway.target_series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2025, 2050]);
        assert_eq!(pathway.target_series[1].target_tons, 25e6);
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        let a = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let b = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        let mut shuffled = intensity.clone();
        shuffled.reverse();
        let a = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let b = compute_goal_tracker_at(&shuffled, &generation, &targets(), true, now());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_intensity_is_insufficient_data() {
        let generation = generation_at(&intensity(12), 1_000.0);
        let outcome = compute_goal_tracker_at(&[], &generation, &targets(), true, now());
        assert!(outcome.is_insufficient());
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"error":"insufficient_data"}"#);
    }

    #[test]
    fn empty_generation_is_insufficient_data() {
        let outcome = compute_goal_tracker_at(&intensity(12), &[], &targets(), true, now());
        assert!(outcome.is_insufficient());
    }

    #[test]
    fn missing_current_year_target_omits_dependent_indicators() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        let targets = vec![target(2020, Some(31.0), Some(30.0))];
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets, true, now());
        let result = computed(&outcome);

        assert_eq!(result.alignment_index_pct, None);
        assert_eq!(result.budget, None);
        assert_eq!(result.velocity, None);
        assert_eq!(result.context.target_intensity, None);

        let pathway = result.pathway.as_ref().unwrap();
        assert_eq!(pathway.eta_year, None);
        let years: Vec<i32> = pathway.target_series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2050]);
    }

    #[test]
    fn nine_samples_in_window_give_no_velocity_ten_do() {
        let mut older = Vec::new();
        let stale = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        for i in 0..3 {
            older.push(IntensitySample {
                timestamp: stale + Duration::hours(i),
                intensity_g_per_kwh: 320.0,
            });
        }

        let mut nine = intensity(9);
        nine.extend(older.iter().copied());
        let generation = generation_at(&nine, 1_000.0);
        assert!(nine.len() >= MIN_TREND_SAMPLES);
        let outcome = compute_goal_tracker_at(&nine, &generation, &targets(), true, now());
        let result = computed(&outcome);
        assert_eq!(result.velocity, None);
        assert_eq!(result.pathway.as_ref().unwrap().eta_year, None);

        let mut ten = intensity(10);
        ten.extend(older.iter().copied());
        let outcome = compute_goal_tracker_at(&ten, &generation, &targets(), true, now());
        assert!(computed(&outcome).velocity.is_some());
    }

    #[test]
    fn over_budget_reports_negative_days_ahead() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        // 0.0001 Mt = 100 t for the whole year, already exceeded.
        let targets = vec![
            target(2020, Some(31.0), Some(30.0)),
            target(2025, None, Some(0.0001)),
        ];
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets, true, now());
        let budget = computed(&outcome).budget.unwrap();
        assert!(budget.days_ahead < 0.0, "days_ahead={}", budget.days_ahead);
    }

    #[test]
    fn zero_output_gives_zero_days_ahead() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 0.0);
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let budget = computed(&outcome).budget.unwrap();
        assert_eq!(budget.ytd_emitted_tons, 0.0);
        assert_eq!(budget.days_ahead, 0.0);
    }

    #[test]
    fn required_rate_is_positive_when_behind_target() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        // I_target = 400 * 10 / 31 = 129 < 300, so intensity has to keep falling.
        let targets = vec![
            target(2020, Some(31.0), Some(30.0)),
            target(2025, None, Some(10.0)),
        ];
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets, true, now());
        let velocity = computed(&outcome).velocity.unwrap();

        let i_target = 400.0 * 10.0 / 31.0;
        let latest = Utc.with_ymd_and_hms(2025, 6, 15, 11, 0, 0).unwrap();
        let year_end = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let days_left = (year_end - latest).num_seconds() as f64 / 86_400.0;
        let expected = (300.0 - i_target) * 365.0 / days_left;
        assert!((velocity.required_rate - expected).abs() < 1e-9);
        assert!(velocity.on_track == (velocity.actual_rate >= velocity.required_rate));
    }

    #[test]
    fn rising_intensity_keeps_velocity_but_gives_no_eta() {
        let mut intensity = intensity(0);
        let last = Utc.with_ymd_and_hms(2025, 6, 15, 11, 0, 0).unwrap();
        for h in 0..48 {
            let hours_before_last = 47 - h;
            intensity.push(IntensitySample {
                timestamp: last - Duration::hours(hours_before_last),
                intensity_g_per_kwh: 300.0 - hours_before_last as f64 / 24.0,
            });
        }
        let generation = generation_at(&intensity, 1_000.0);

        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let result = computed(&outcome);
        let velocity = result.velocity.unwrap();
        assert!((velocity.actual_rate + 365.0).abs() < 1e-6, "actual={}", velocity.actual_rate);
        assert_eq!(velocity.required_rate, 0.0);
        assert!(!velocity.on_track);

        let pathway = result.pathway.as_ref().unwrap();
        assert_eq!(pathway.eta_year, None);
        let years: Vec<i32> = pathway.target_series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2025, 2050]);
    }

    #[test]
    fn days_left_is_at_least_one_when_latest_sample_is_past_year_end() {
        let mut intensity = intensity(0);
        let last = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        for h in 0..48 {
            intensity.push(IntensitySample {
                timestamp: last - Duration::hours(47 - h),
                intensity_g_per_kwh: 300.0,
            });
        }
        let generation: Vec<GenerationSample> = [0, 15]
            .iter()
            .map(|m| GenerationSample {
                timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 0, *m, 0).unwrap(),
                total_output_mw: 1_000.0,
                breakdown: None,
            })
            .collect();
        let targets = vec![
            target(2020, Some(31.0), Some(30.0)),
            target(2025, None, Some(10.0)),
        ];

        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets, true, now());
        let velocity = computed(&outcome).velocity.unwrap();
        let i_target = 400.0 * 10.0 / 31.0;
        let expected = (300.0 - i_target) * 365.0;
        assert!((velocity.required_rate - expected).abs() < 1e-6, "required={}", velocity.required_rate);
        assert!(velocity.actual_rate.abs() < 1e-6);
        assert!(!velocity.on_track);
    }

    #[test]
    fn non_positive_latest_intensity_omits_alignment() {
        let mut intensity = intensity(48);
        if let Some(last) = intensity.last_mut() {
            last.intensity_g_per_kwh = 0.0;
        }
        let generation = generation_at(&intensity, 1_000.0);
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let result = computed(&outcome);
        assert_eq!(result.alignment_index_pct, None);
        assert!(result.context.target_intensity.is_some());
    }

    #[test]
    fn current_year_base_uses_current_year_actual() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);

        // No 2025 actual: target intensity is undefined.
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets(), false, now());
        let result = computed(&outcome);
        assert_eq!(result.context.base_year, 2025);
        assert_eq!(result.context.base_year_source, BaseYearSource::CurrentYear);
        assert_eq!(result.context.target_intensity, None);
        // The budget only needs the current-year target.
        assert!(result.budget.is_some());

        let targets = vec![target(2025, Some(25.0), Some(25.0))];
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets, false, now());
        let result = computed(&outcome);
        // Base = median of 2025 samples, target/actual = 1.
        let base = result.context.base_intensity;
        let target = result.context.target_intensity.unwrap();
        assert!((target - base).abs() < 1e-9, "target={target} base={base}");
    }

    #[test]
    fn series_decide_base_year_without_targets() {
        let intensity = intensity(48);
        let generation = generation_at(&intensity, 1_000.0);
        let outcome = compute_goal_tracker_at(&intensity, &generation, &[], true, now());
        let result = computed(&outcome);
        assert_eq!(result.context.base_year, 2020);
        assert_eq!(result.context.base_year_source, BaseYearSource::Series);
        assert!(result.pathway.is_none());
    }

    #[test]
    fn base_year_without_samples_falls_back_to_latest() {
        let intensity: Vec<IntensitySample> =
            intensity(48).into_iter().filter(|s| s.timestamp.year() == 2025).collect();
        let generation = generation_at(&intensity, 1_000.0);
        let outcome = compute_goal_tracker_at(&intensity, &generation, &targets(), true, now());
        let result = computed(&outcome);
        assert_eq!(result.context.base_year, 2020);
        assert_eq!(result.context.base_intensity, result.context.latest_intensity);
    }

    #[test]
    fn target_series_keeps_first_record_per_year_and_single_terminal_point() {
        let targets = vec![
            target(2030, None, Some(20.0)),
            target(2020, None, Some(30.0)),
            target(2030, None, Some(99.0)),
            target(2050, None, Some(0.0)),
            target(2040, None, None),
        ];
        let series = target_series(&targets);
        let years: Vec<i32> = series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2030, 2050]);
        assert_eq!(series[1].target_tons, 20e6);
        assert_eq!(series[2].target_tons, 0.0);
    }

    #[test]
    fn target_series_appends_net_zero_year() {
        let series = target_series(&[target(2025, None, Some(25.0))]);
        let last = series.last().unwrap();
        assert_eq!(last.year, NET_ZERO_YEAR);
        assert_eq!(last.target_tons, 0.0);
        assert!(target_series(&[target(2025, Some(1.0), None)]).is_empty());
    }
}
