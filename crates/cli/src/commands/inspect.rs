//! Inspection of saved metrics documents

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use monitor_lib::alerts::ThresholdTable;
use monitor_lib::persistence::MetricsDocument;
use monitor_lib::Monitor;
use tabled::{settings::Style, Table, Tabled};

use crate::dashboard;
use crate::output::{color_level, print_info, OutputFormat};

/// Row for the stored alerts table
#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Load a saved document, rebuild the monitor state and show its dashboard
pub async fn inspect_metrics(
    path: &Path,
    thresholds: &ThresholdTable,
    format: OutputFormat,
) -> Result<()> {
    let document = MetricsDocument::load(path)
        .await
        .with_context(|| format!("Failed to load metrics from {}", path.display()))?;

    let saved_at = document.timestamp;
    let alerts = document.alerts.clone();
    let monitor = Monitor::builder()
        .thresholds(thresholds.clone())
        .restore(document)
        .build()
        .with_context(|| format!("Failed to restore metrics from {}", path.display()))?;
    let snapshot = monitor.snapshot().await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Table => {
            print_info(&format!(
                "Metrics saved at {} from {}",
                saved_at.to_rfc3339(),
                path.display()
            ));
            print!("{}", dashboard::render(&snapshot, monitor.thresholds(), None, None));

            if !alerts.is_empty() {
                println!();
                println!("{}", "Stored Alerts".bold());
                let rows: Vec<AlertRow> = alerts
                    .iter()
                    .map(|alert| AlertRow {
                        timestamp: alert.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                        level: color_level(alert.level, alert.level.as_str()),
                        message: alert.message.clone(),
                    })
                    .collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }
    }

    Ok(())
}
