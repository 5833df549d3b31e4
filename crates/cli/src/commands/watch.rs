//! Live dashboard command

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use monitor_lib::source::FileDiagnosticsProvider;
use monitor_lib::Monitor;
use tokio::time::{interval_at, Instant};

use crate::config::Settings;
use crate::dashboard::{self, Reminders};
use crate::output::{print_info, print_success, print_warning, OutputFormat};

/// Options for a watch run, after merging CLI flags over settings
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub duration: Duration,
    pub refresh: Duration,
    pub output: PathBuf,
    pub metrics_out: Option<PathBuf>,
    pub clear: bool,
}

/// Build a monitor from settings
pub fn build_monitor(settings: &Settings) -> Result<Monitor> {
    let mut builder = Monitor::builder()
        .interval(settings.interval())
        .stop_timeout(settings.stop_timeout())
        .thresholds(settings.thresholds.clone());

    if let Some(path) = &settings.diagnostics_path {
        builder = builder.diagnostics(Arc::new(FileDiagnosticsProvider::new(path)));
    } else if let Some(seed) = settings.seed {
        builder = builder.seed(seed);
    }

    builder.build().context("Failed to build monitor")
}

/// Run the monitor, redraw the dashboard periodically, then save the metrics
pub async fn run_watch(
    settings: &Settings,
    options: &WatchOptions,
    format: OutputFormat,
) -> Result<()> {
    let monitor = build_monitor(settings)?;

    if format == OutputFormat::Table {
        let source = match &settings.diagnostics_path {
            Some(path) => format!("diagnostics from {}", path.display()),
            None => "simulated metrics".to_string(),
        };
        print_info(&format!(
            "Starting monitoring dashboard with {} every {}ms for {} seconds",
            source,
            monitor.config().interval.as_millis(),
            options.duration.as_secs()
        ));
    }

    monitor.start().await;

    let mut reminders = Reminders::new(settings.seed);
    let deadline = tokio::time::sleep(options.duration);
    tokio::pin!(deadline);
    let mut refresh = interval_at(Instant::now() + options.refresh, options.refresh);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = refresh.tick() => show(&monitor, format, options.clear, &mut reminders).await?,
            _ = tokio::signal::ctrl_c() => {
                print_warning("Interrupted, stopping monitor");
                break;
            }
        }
    }

    monitor.stop().await;

    monitor
        .save_metrics(&options.output)
        .await
        .with_context(|| format!("Failed to save metrics to {}", options.output.display()))?;

    if let Some(path) = &options.metrics_out {
        write_metrics_text(&monitor, path).await?;
    }

    if format == OutputFormat::Table {
        print_success(&format!("Metrics saved to {}", options.output.display()));
    }

    Ok(())
}

async fn show(
    monitor: &Monitor,
    format: OutputFormat,
    clear: bool,
    reminders: &mut Reminders,
) -> Result<()> {
    let snapshot = monitor.snapshot().await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        OutputFormat::Table => {
            let health = monitor.health().await;
            if clear && !snapshot.is_empty() {
                print!("{}", dashboard::CLEAR_SCREEN);
            }
            print!(
                "{}",
                dashboard::render(
                    &snapshot,
                    monitor.thresholds(),
                    Some(&health),
                    Some(reminders.pick()),
                )
            );
        }
    }

    Ok(())
}

async fn write_metrics_text(monitor: &Monitor, path: &Path) -> Result<()> {
    let text = monitor.metrics_text()?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write Prometheus metrics to {}", path.display()))
}
