//! LFM Metrics Monitor CLI
//!
//! Runs the live monitoring dashboard, inspects saved metrics documents
//! and shows the alert thresholds in effect.

mod commands;
mod config;
mod dashboard;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{inspect, thresholds, watch};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// LFM Metrics Monitor
#[derive(Parser)]
#[command(name = "lfm-monitor")]
#[command(author, version, about = "Metrics monitor and dashboard for the LFM AI system", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Path to a configuration file (uses ~/.config/lfm-monitor/config.toml if not specified)
    #[arg(long, short, global = true, env = "LFM_MONITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the monitor and show a live dashboard
    Watch(WatchArgs),

    /// Show the dashboard for a saved metrics file
    Inspect {
        /// Metrics document written by `watch`
        file: PathBuf,
    },

    /// Show the alert thresholds in effect
    Thresholds,
}

#[derive(Args)]
pub struct WatchArgs {
    /// How long to run, in seconds
    #[arg(long, short)]
    pub duration: Option<u64>,

    /// Dashboard refresh period, in seconds
    #[arg(long, short)]
    pub refresh: Option<u64>,

    /// Sampling interval, in milliseconds
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Read metrics from a JSON diagnostics file instead of simulating them
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,

    /// Seed for simulated metrics
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to save the metrics document on exit
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write Prometheus text metrics of the run to this file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,

    /// Do not clear the screen between redraws
    #[arg(long)]
    pub no_clear: bool,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let mut settings = config::Settings::load(cli.config.as_deref())?;
    debug!(?settings, "Configuration loaded");

    match cli.command {
        Commands::Watch(args) => {
            if let Some(interval) = args.interval {
                settings.interval_ms = interval;
            }
            if let Some(seed) = args.seed {
                settings.seed = Some(seed);
            }
            if let Some(path) = args.diagnostics {
                settings.diagnostics_path = Some(path);
            }

            let options = watch::WatchOptions {
                duration: Duration::from_secs(args.duration.unwrap_or(settings.duration_secs)),
                refresh: Duration::from_secs(args.refresh.unwrap_or(settings.refresh_secs).max(1)),
                output: args.output.unwrap_or_else(|| settings.output_path.clone()),
                metrics_out: args.metrics_out,
                clear: !args.no_clear,
            };
            watch::run_watch(&settings, &options, cli.format).await?;
        }
        Commands::Inspect { file } => {
            inspect::inspect_metrics(&file, &settings.thresholds, cli.format).await?;
        }
        Commands::Thresholds => {
            thresholds::show_thresholds(&settings.thresholds, cli.format)?;
        }
    }

    Ok(())
}
