//! Synthetic grid data.
//!
//! Each step produces one generation-mix record, one CO2-intensity record
//! derived from its renewable share, and one yearly net-zero alignment record.
//! The mix follows an evening-peaking demand curve and is perturbed by weather,
//! planned outages and fossil price shocks, so the series move enough to be
//! worth tracking.

use std::time::Duration as WallDuration;

use chrono::{DateTime, Datelike, Duration, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use tracing::{debug, info};

use crate::config::{SimTimezone, SimulatorConfig};
use crate::data::RecordSink;
use crate::domain::{Co2IntensityRecord, GenerationMixRecord, NetZeroAlignmentRecord};
use crate::error::AppError;
use crate::math::round_to;

/// System demand at a load factor of 1.0.
pub const BASE_TOTAL_MW: f64 = 7_000.0;

const PEAK_HOUR: u32 = 19;
const SOLAR_HOURS: std::ops::RangeInclusive<u32> = 8..=18;

const OUTAGE_PROBABILITY: f64 = 0.15;
const OUTAGE_FACTOR: f64 = 0.3;
const PRICE_SHOCK_PROBABILITY: f64 = 0.1;
const PRICE_SHOCK_FACTOR: f64 = 0.4;

const INTENSITY_RANGE: (f64, f64) = (100.0, 300.0);
const INTENSITY_FLOOR: f64 = 50.0;
const INTENSITY_CEILING: f64 = 400.0;

/// A normal draw clamped to `[lower, upper]`.
pub fn bounded_normal(rng: &mut StdRng, base: f64, std_dev: f64, lower: f64, upper: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    (base + std_dev * z).max(lower).min(upper)
}

/// Demand factor in `[min_factor, max_factor]`, peaking at 19:00 local time.
pub fn diurnal_profile(hour: u32, min_factor: f64, max_factor: f64) -> f64 {
    let phase = (hour + 24 - PEAK_HOUR % 24) % 24;
    let cos_val = ((f64::from(phase) / 24.0 * std::f64::consts::TAU).cos() + 1.0) / 2.0;
    min_factor + (max_factor - min_factor) * cos_val
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherFactors {
    pub wind: f64,
    pub solar: f64,
    pub hydro: f64,
}

pub fn weather_variation(rng: &mut StdRng) -> WeatherFactors {
    WeatherFactors {
        wind: bounded_normal(rng, 1.0, 0.8, 0.1, 3.0),
        solar: bounded_normal(rng, 1.0, 1.0, 0.05, 4.0),
        hydro: bounded_normal(rng, 1.0, 0.3, 0.3, 2.0),
    }
}

pub fn planned_outage_factor(rng: &mut StdRng) -> f64 {
    let roll: f64 = rng.r#gen();
    if roll < OUTAGE_PROBABILITY { OUTAGE_FACTOR } else { 1.0 }
}

pub fn fossil_price_shock_factor(rng: &mut StdRng) -> f64 {
    let roll: f64 = rng.r#gen();
    if roll < PRICE_SHOCK_PROBABILITY { PRICE_SHOCK_FACTOR } else { 1.0 }
}

/// Map renewable share to an intensity in `range`: 80% renewables sits at the
/// low end, 10% at the high end, with noise on top.
pub fn compute_co2_intensity(rng: &mut StdRng, renewable_share_pct: f64, range: (f64, f64)) -> f64 {
    let (low, high) = range;
    let norm = ((80.0 - renewable_share_pct) / 70.0).clamp(0.0, 1.0);
    let base = low + norm * (high - low);
    bounded_normal(rng, base, 50.0, low, high)
}

pub fn simulate_generation_mix(rng: &mut StdRng, ts: DateTime<Utc>, timezone: &SimTimezone) -> GenerationMixRecord {
    let hour = timezone.local_hour(ts);
    let load_factor = diurnal_profile(hour, 0.85, 1.15);
    let weather = weather_variation(rng);
    let outage = planned_outage_factor(rng);
    let price_shock = fossil_price_shock_factor(rng);

    let base_hydro = 950.0 * bounded_normal(rng, 1.0, 0.8, 0.1, 4.0);
    let base_wind = 1_800.0 * bounded_normal(rng, 1.0, 1.2, 0.05, 5.0);
    let solar_capacity = if SOLAR_HOURS.contains(&hour) { 150.0 } else { 10.0 };
    let base_solar = solar_capacity * bounded_normal(rng, 1.0, 1.5, 0.02, 6.0);
    let base_nuclear = 2_700.0 * bounded_normal(rng, 1.0, 0.5, 0.3, 3.0);
    let base_fossil = (1_600.0 * load_factor).max(1_200.0) * bounded_normal(rng, 1.0, 0.8, 0.2, 4.0);

    let mut hydro = (base_hydro * weather.hydro).max(0.0);
    let mut wind = (base_wind * weather.wind).max(0.0);
    let mut solar = (base_solar * weather.solar).max(0.0);
    let mut nuclear = (base_nuclear * outage).max(0.0);
    let mut fossil = (base_fossil * price_shock).max(0.0);

    // Rescale so the mix meets demand.
    let raw_total = hydro + wind + solar + nuclear + fossil;
    let scale = if raw_total > 0.0 { BASE_TOTAL_MW * load_factor / raw_total } else { 1.0 };
    for value in [&mut hydro, &mut wind, &mut solar, &mut nuclear, &mut fossil] {
        *value *= scale;
    }

    let total = hydro + wind + solar + nuclear + fossil;
    let renewable_share_pct = if total > 0.0 { 100.0 * (hydro + wind + solar) / total } else { 0.0 };

    GenerationMixRecord {
        id: None,
        timestamp: ts,
        hydro_mw: round_to(hydro, 1),
        wind_mw: round_to(wind, 1),
        solar_mw: round_to(solar, 1),
        nuclear_mw: round_to(nuclear, 1),
        fossil_mw: round_to(fossil, 1),
        total_mw: round_to(total, 1),
        renewable_share_pct: round_to(renewable_share_pct, 1),
    }
}

pub fn simulate_co2_intensity(
    rng: &mut StdRng,
    ts: DateTime<Utc>,
    generation: &GenerationMixRecord,
) -> Co2IntensityRecord {
    let base = compute_co2_intensity(rng, generation.renewable_share_pct, INTENSITY_RANGE);
    let variation = bounded_normal(rng, 1.0, 0.3, 0.5, 2.0);
    let intensity = (base * variation).clamp(INTENSITY_FLOOR, INTENSITY_CEILING);
    Co2IntensityRecord {
        id: None,
        timestamp: ts,
        co2_intensity_g_per_kwh: round_to(intensity, 1),
    }
}

/// Target falls 1 Mt per year from 30 Mt in 2020, floored at 10 Mt.
pub fn netzero_target_mt(year: i32) -> f64 {
    f64::from((30 - (year - 2020)).max(10))
}

pub fn simulate_netzero_alignment(rng: &mut StdRng, year: i32) -> NetZeroAlignmentRecord {
    let target = netzero_target_mt(year);
    let actual = bounded_normal(rng, target * 1.02, 1.0, target * 0.8, target * 1.2);
    let alignment_pct = if actual > 0.0 { 100.0 * target / actual } else { 0.0 };
    NetZeroAlignmentRecord {
        year,
        actual_emissions_mt: round_to(actual, 1),
        target_emissions_mt: target,
        alignment_pct: alignment_pct.round(),
    }
}

/// Records produced by one simulated step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedStep {
    pub anchor: DateTime<Utc>,
    pub generation: GenerationMixRecord,
    pub co2: Co2IntensityRecord,
    pub netzero: NetZeroAlignmentRecord,
}

pub struct Simulator<'a> {
    config: SimulatorConfig,
    rng: StdRng,
    sinks: Vec<&'a dyn RecordSink>,
}

impl<'a> Simulator<'a> {
    pub fn new(config: SimulatorConfig, sinks: Vec<&'a dyn RecordSink>) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng, sinks }
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(self.config.step_minutes)
    }

    /// Generate and persist one step at `anchor`, or at the current time rounded
    /// down to the step size.
    pub fn run_once(&mut self, anchor: Option<DateTime<Utc>>) -> Result<SimulatedStep, AppError> {
        let anchor = match anchor {
            Some(ts) => ts,
            None => floor_to_step(Utc::now(), self.config.step_minutes)?,
        };

        let generation = simulate_generation_mix(&mut self.rng, anchor, &self.config.timezone);
        let co2 = simulate_co2_intensity(&mut self.rng, anchor, &generation);
        let netzero = simulate_netzero_alignment(&mut self.rng, anchor.year());

        for sink in &self.sinks {
            sink.write_co2(std::slice::from_ref(&co2))?;
            sink.write_generation(std::slice::from_ref(&generation))?;
            sink.upsert_targets(std::slice::from_ref(&netzero))?;
        }
        debug!(
            %anchor,
            intensity = co2.co2_intensity_g_per_kwh,
            renewable_share = generation.renewable_share_pct,
            "simulated step"
        );

        Ok(SimulatedStep { anchor, generation, co2, netzero })
    }

    /// Advance simulated time by one step per wall-clock tick, handing each step
    /// to `on_step` as soon as it is persisted.
    ///
    /// Runs forever when `max_steps` is `None`. Returns the number of steps produced.
    pub fn run_continuous(
        &mut self,
        max_steps: Option<usize>,
        mut on_step: impl FnMut(&SimulatedStep),
    ) -> Result<usize, AppError> {
        if max_steps == Some(0) {
            return Ok(0);
        }

        let wall = WallDuration::from_secs(self.config.wall_interval_seconds);
        let step = self.step();

        let first = self.run_once(None)?;
        let mut anchor = first.anchor;
        on_step(&first);
        let mut produced = 1usize;
        info!(%anchor, step_minutes = self.config.step_minutes, "simulator started");

        while max_steps.is_none_or(|max| produced < max) {
            std::thread::sleep(wall);
            anchor += step;
            let next = self.run_once(Some(anchor))?;
            on_step(&next);
            produced += 1;
        }
        Ok(produced)
    }
}

/// Round `ts` down to a multiple of `step_minutes` since the epoch.
pub fn floor_to_step(ts: DateTime<Utc>, step_minutes: i64) -> Result<DateTime<Utc>, AppError> {
    let step_seconds = step_minutes * 60;
    if step_seconds <= 0 {
        return Err(AppError::config("Step size must be > 0 minutes."));
    }
    let secs = ts.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(step_seconds), 0)
        .ok_or_else(|| AppError::runtime("Simulation anchor out of range."))
}
