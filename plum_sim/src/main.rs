//! PLUM Simulator CLI
//!
//! Runs every earthquake of the earthquake table over the sensor network and
//! writes the aggregate event log.

use clap::Parser;
use plum_core::ProtocolConfig;
use plum_sim::{
    load_earthquakes_csv, load_sensors_csv, write_log_csv_file, RunConfig, ScenarioResult,
    ScenarioRunner, SimError, SimExport,
};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// PLUM earthquake early-warning network simulator
#[derive(Parser, Debug)]
#[command(name = "plum-sim")]
#[command(about = "Simulate a PLUM sensor network over a set of earthquakes", long_about = None)]
struct Args {
    /// Sensor table (CSV with id, latitude, longitude)
    #[arg(long, default_value = "./data/sensors.csv")]
    sensors: PathBuf,

    /// Earthquake table (CSV with id, latitude, longitude)
    #[arg(long, default_value = "./data/earthquake.csv")]
    earthquakes: PathBuf,

    /// Aggregate event log output (CSV)
    #[arg(short, long, default_value = "./outputs/log_file.csv")]
    output: PathBuf,

    /// Also export scenarios and statistics as JSON
    #[arg(long)]
    export: Option<PathBuf>,

    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Virtual time simulated per earthquake
    #[arg(short, long, default_value = "120")]
    duration: f64,

    /// Transmission range between sensors (km)
    #[arg(long, default_value = "30")]
    range_km: f64,

    /// P-wave speed (km/s)
    #[arg(long, default_value = "6")]
    p_wave_speed: f64,

    /// S-wave speed (km/s)
    #[arg(long, default_value = "3.5")]
    s_wave_speed: f64,

    /// Fixed delivery latency of every message
    #[arg(long, default_value = "0.05")]
    transmission_delay: f64,

    /// Confirmation waiting window
    #[arg(long, default_value = "5")]
    waiting_window: f64,

    /// Enable missed and false detections
    #[arg(long)]
    noisy: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary on stdout for scripting
    #[arg(long)]
    json: bool,
}

fn run(args: &Args, protocol: ProtocolConfig, run_config: RunConfig) -> Result<Vec<ScenarioResult>, SimError> {
    let sensors = load_sensors_csv(&args.sensors)?;
    let earthquakes = load_earthquakes_csv(&args.earthquakes)?;
    info!(
        "Loaded {} sensors and {} earthquakes",
        sensors.len(),
        earthquakes.len()
    );

    ScenarioRunner::new(protocol, run_config).run_all(&earthquakes, &sensors)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Determine base seed
    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    let protocol = ProtocolConfig::default()
        .with_range_km(args.range_km)
        .with_p_wave_speed(args.p_wave_speed)
        .with_s_wave_speed(args.s_wave_speed)
        .with_transmission_delay(args.transmission_delay)
        .with_waiting_window(args.waiting_window);

    let mut run_config = RunConfig::default()
        .with_seed(seed)
        .with_duration(args.duration);
    if args.noisy {
        run_config = run_config.noisy();
    }

    if !args.json {
        info!("PLUM Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let results = match run(&args, protocol.clone(), run_config.clone()) {
        Ok(results) => results,
        Err(e) => {
            error!("Simulation aborted: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Cannot create {}: {}", parent.display(), e);
                std::process::exit(1);
            }
        }
    }
    if let Err(e) = write_log_csv_file(&args.output, &results) {
        error!("Failed to write {}: {}", args.output.display(), e);
        std::process::exit(1);
    }
    info!("Wrote event log to {}", args.output.display());

    if let Some(export_path) = &args.export {
        let export = SimExport::new(&protocol, &run_config, &results);
        if let Err(e) = export.write_to_file(export_path) {
            error!("Failed to write export: {}", e);
            std::process::exit(1);
        }
        info!("Exported {} scenarios to {}", results.len(), export_path.display());
    }

    if args.json {
        let summary = serde_json::json!({
            "seed": seed,
            "scenarios": results.iter().map(|r| {
                serde_json::json!({
                    "eq_id": r.report.eq_id,
                    "entries": r.entries.len(),
                    "stats": r.report.stats,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to render summary: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        for result in &results {
            let stats = &result.report.stats;
            info!(
                "{}: {} alerted, {} cancellations, {} messages, {} log entries",
                result.report.eq_id,
                stats.alerts,
                stats.cancellations,
                stats.messages_delivered,
                result.entries.len()
            );
        }
    }
}
