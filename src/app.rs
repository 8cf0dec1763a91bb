//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the log subscriber
//! - parses CLI arguments and resolves configuration
//! - picks the data store for each command
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{BaseYear, Command, SimulateArgs, SimulateMode, Source, SourceArgs, TrackArgs};
use crate::config::{SimulatorConfig, StoreConfig};
use crate::data::simulate::{SimulatedStep, Simulator};
use crate::data::supabase::SupabaseClient;
use crate::data::{DatasetProvider, RecordSink};
use crate::error::AppError;
use crate::io::CsvStore;

pub mod pipeline;

use pipeline::LoadLimits;

/// Entry point for the `nzt` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Simulate(args) => handle_simulate(args),
        Command::Track(args) => handle_track(args),
        Command::Summary(args) => handle_summary(args),
    }
}

/// Logs go to stderr so stdout stays clean for reports. `RUST_LOG` overrides the `warn` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulator_config_from_args(SimulatorConfig::from_env()?, &args)?;

    let csv = config.output_mode.writes_csv().then(|| CsvStore::from_config(&config.store));
    let supabase = if config.output_mode.writes_supabase() {
        if config.store.supabase_enabled() {
            Some(SupabaseClient::from_config(&config.store)?)
        } else {
            return Err(AppError::config(
                "OUTPUT_MODE includes supabase but SUPABASE_URL/SUPABASE_KEY are not set.",
            ));
        }
    } else {
        None
    };

    let mut sinks: Vec<&dyn RecordSink> = Vec::new();
    if let Some(store) = &csv {
        info!(dir = %store.dir().display(), "writing CSV records");
        sinks.push(store);
    }
    if let Some(client) = &supabase {
        sinks.push(client);
    }

    let mut simulator = Simulator::new(config, sinks);
    match args.mode {
        SimulateMode::Once => {
            let step = simulator.run_once(None)?;
            println!("{}", format_step(&step));
        }
        SimulateMode::Continuous => {
            let produced = simulator.run_continuous(args.steps, |step| println!("{}", format_step(step)))?;
            info!(steps = produced, "simulator stopped");
        }
    }
    Ok(())
}

pub fn simulator_config_from_args(mut config: SimulatorConfig, args: &SimulateArgs) -> Result<SimulatorConfig, AppError> {
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(mode) = args.output {
        config.output_mode = mode;
    }
    if let Some(wall) = args.wall {
        config.wall_interval_seconds = wall;
    }
    if let Some(step) = args.step {
        if step <= 0 {
            return Err(AppError::config("--step must be > 0 minutes."));
        }
        config.step_minutes = step;
    }
    Ok(config)
}

fn format_step(step: &SimulatedStep) -> String {
    format!(
        "{}  total {:.1} MW  renewable {:.1}%  CO2 {:.1} g/kWh",
        step.anchor.to_rfc3339(),
        step.generation.total_mw,
        step.generation.renewable_share_pct,
        step.co2.co2_intensity_g_per_kwh
    )
}

fn handle_track(args: TrackArgs) -> Result<(), AppError> {
    let provider = open_provider(&args.source)?;
    let outcome = pipeline::run_tracker(
        provider.as_ref(),
        load_limits(&args.source),
        args.base_year == BaseYear::Data,
        args.now,
    )?;

    println!("{}", crate::report::format_goal_tracker(&outcome));

    if let Some(path) = &args.json {
        crate::io::export::write_outcome_json(path, &outcome)?;
    }
    Ok(())
}

fn handle_summary(args: SourceArgs) -> Result<(), AppError> {
    let provider = open_provider(&args)?;
    let summary = pipeline::run_summary(provider.as_ref(), load_limits(&args))?;
    println!(
        "{}",
        crate::report::format_summaries(&summary.co2, &summary.generation, &summary.netzero)
    );
    Ok(())
}

fn load_limits(args: &SourceArgs) -> LoadLimits {
    LoadLimits {
        series: args.limit,
        targets: args.targets_limit,
    }
}

fn open_provider(args: &SourceArgs) -> Result<Box<dyn DatasetProvider>, AppError> {
    let store = StoreConfig::from_env();
    match args.source {
        Source::Csv => {
            let csv = match &args.csvdir {
                Some(dir) => CsvStore::new(dir.clone()),
                None => CsvStore::from_config(&store),
            };
            Ok(Box::new(csv))
        }
        Source::Supabase => Ok(Box::new(SupabaseClient::from_config(&store)?)),
    }
}
