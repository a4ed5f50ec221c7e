//! Lorbital CLI: drive the gesture pipeline without a browser.
//!
//! Usage:
//!   lorbital replay <RECORDING>          Run a landmark recording through a viewer session
//!   lorbital synth <OUT> --pattern <P>   Write a synthetic landmark recording
//!   lorbital config                      Print the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lorbital_common::config::AppConfig;

mod commands;

use commands::synth::Pattern;

#[derive(Parser)]
#[command(
    name = "lorbital",
    about = "Hand-gesture manipulation of 3D models, from the command line",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a landmark recording through a viewer session
    Replay {
        /// JSONL landmark recording
        recording: PathBuf,

        /// Tuning overrides (JSON); defaults come from the user config
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Render rate in Hz of recording time
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Keep ticking this long after the last frame so pending releases fire
        #[arg(long, default_value = "1000")]
        settle_ms: u64,

        /// Pace ticks against the wall clock
        #[arg(long)]
        realtime: bool,

        /// Print the final status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a synthetic landmark recording
    Synth {
        /// Output file
        out: PathBuf,

        /// Motion to synthesize
        #[arg(long, value_enum, default_value = "drag")]
        pattern: Pattern,

        /// Camera frames per second
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Number of pinching frames
        #[arg(long, default_value = "45")]
        frames: u32,
    },

    /// Print the effective configuration
    Config {
        /// Also show tuning loaded from this file
        #[arg(long)]
        tuning: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load();
    let mut logging = app_config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    logging.json |= cli.log_json;
    lorbital_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            recording,
            tuning,
            fps,
            settle_ms,
            realtime,
            json,
        } => {
            let options = commands::replay::ReplayOptions {
                tuning,
                fps,
                settle_ms,
                realtime,
                json,
            };
            commands::replay::run(recording, &app_config, options).await
        }
        Commands::Synth {
            out,
            pattern,
            fps,
            frames,
        } => commands::synth::run(out, pattern, fps, frames),
        Commands::Config { tuning } => commands::config::run(&app_config, tuning),
    }
}
