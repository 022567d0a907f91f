//! Stagehand CLI
//!
//! Run the demo scene and inspect configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stagehand_app::{HeadlessRunConfig, HeadlessRuntime, Stage, StageConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene;

use scene::{Orbit, OrbitHandle};

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stagehand frame loop and animation runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the orbit demo scene
    Run {
        /// Configuration file (stagehand.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of frames to run
        #[arg(short, long, default_value = "150")]
        frames: u32,

        /// Override the configured tick rate
        #[arg(short, long)]
        tick_rate: Option<u32>,

        /// Tick on a simulated clock without sleeping
        #[arg(long)]
        headless: bool,
    },

    /// Print the default configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            config,
            frames,
            tick_rate,
            headless,
        } => cmd_run(config.as_deref(), frames, tick_rate, headless),

        Commands::Config => cmd_config(),
    }
}

fn cmd_run(config_path: Option<&Path>, frames: u32, tick_rate: Option<u32>, headless: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => StageConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StageConfig::default(),
    };
    if let Some(rate) = tick_rate {
        config.scheduler.tick_rate = rate;
    }

    info!(
        "Running orbit demo for {} frames ({})",
        frames,
        if headless { "headless" } else { "real time" }
    );

    if headless {
        let mut runtime = HeadlessRuntime::new(config);
        let orbit = add_scene(runtime.stage_mut());
        let tick_ms = (1000 / runtime.stage().scheduler().tick_rate()).max(1) as u64;
        runtime.run(
            HeadlessRunConfig {
                max_frames: frames,
                tick_ms,
            },
            |_, _| {},
        )?;
        report(runtime.stage(), &orbit);
    } else {
        let mut stage = Stage::new(config);
        let orbit = add_scene(&mut stage);
        stage.run_for(frames as u64)?;
        report(&stage, &orbit);
    }

    Ok(())
}

/// Register the demo scene after the built-in participants
fn add_scene(stage: &mut Stage) -> OrbitHandle {
    let orbit = Orbit::new(
        stage.animations(),
        stage.surface().clone(),
        stage.diagnostics().namespace("orbit"),
    );
    let handle = orbit.handle();
    stage.register(orbit);
    handle
}

fn report(stage: &Stage, orbit: &OrbitHandle) {
    let clock = stage.clock();
    info!(
        "Finished after {} frames, {:.1} ms simulated: angle {:.2}, radius {:.2}, {} laps",
        clock.frame_count,
        clock.simulated_time,
        orbit.angle(),
        orbit.radius(),
        orbit.laps()
    );
}

fn cmd_config() -> Result<()> {
    let text = StageConfig::default()
        .to_toml_string()
        .context("Failed to render default config")?;
    print!("{text}");
    Ok(())
}
