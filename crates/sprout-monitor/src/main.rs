//! Sprout monitor - telemetry session and dashboard derivation.
//!
//! Run with: `cargo run -p sprout-monitor -- demo`

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sprout_monitor::{Config, default_config_path, demo};

/// Sprout monitor - telemetry session and dashboard derivation.
#[derive(Parser, Debug)]
#[command(name = "sprout-monitor")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulated device feed against the in-memory store.
    Demo {
        /// Number of simulated readings to emit.
        #[arg(long, default_value_t = 12)]
        ticks: u64,
    },

    /// Load and validate the configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sprout_monitor=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config = if config_path.exists() {
        Config::load(&config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else {
        Config::default()
    }
    .with_env_overrides();
    config.validate()?;

    match args.command.unwrap_or(Command::Demo { ticks: 12 }) {
        Command::Demo { ticks } => demo::run(config, ticks).await,
        Command::CheckConfig => {
            println!(
                "configuration OK: device '{}', history window {}, reset every {}h",
                config.device_id, config.history_limit, config.reset_window_hours
            );
            Ok(())
        }
    }
}
