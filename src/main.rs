//! voxelwild - headless voxel sandbox runner

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use voxelwild::{GameConfig, HeadlessConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a voxelwild world without a window", long_about = None)]
struct Args {
    /// Game configuration (TOML); missing or invalid files fall back to defaults
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// World seed, overriding the configured one
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run, overriding the configured duration
    #[arg(long)]
    seconds: Option<f32>,

    /// Write session events as JSON lines to this path
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the run report as JSON to this path instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,

    /// Let the world run without the scripted player
    #[arg(long)]
    no_autopilot: bool,

    /// Label stored in the run report
    #[arg(long, default_value = "headless")]
    run_name: String,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting voxelwild v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut game = GameConfig::load_from_path(&args.config);
    if let Some(seed) = args.seed {
        game.world.seed = seed;
    }
    if args.no_autopilot {
        game.session.autopilot = false;
    }

    let print_report = args.report.is_none();
    let report = voxelwild::run(HeadlessConfig {
        game,
        run_name: args.run_name,
        seconds: args.seconds,
        events: args.events,
        report: args.report,
    })?;

    if print_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
