//! Threshold table command

use anyhow::Result;
use monitor_lib::alerts::ThresholdTable;
use tabled::{settings::Style, Table, Tabled};

use crate::output::{format_count, OutputFormat};

/// Row for the thresholds table
#[derive(Tabled)]
struct ThresholdRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Warning below")]
    warning: String,
    #[tabled(rename = "Critical below")]
    critical: String,
}

/// Show the effective threshold table
pub fn show_thresholds(thresholds: &ThresholdTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(thresholds)?);
        }
        OutputFormat::Table => {
            println!("{}", Table::new(threshold_rows(thresholds)).with(Style::rounded()));
        }
    }
    Ok(())
}

fn threshold_rows(thresholds: &ThresholdTable) -> Vec<ThresholdRow> {
    thresholds
        .rows()
        .into_iter()
        .map(|(metric, threshold)| {
            let show = |value: f64| {
                if metric == "operations_rate" {
                    format!("{}/sec", format_count(value))
                } else {
                    format!("{:.2}", value)
                }
            };
            ThresholdRow {
                metric: metric.to_string(),
                warning: show(threshold.warning),
                critical: show(threshold.critical),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_table() {
        let rows = threshold_rows(&ThresholdTable::default());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].metric, "operations_rate");
        assert_eq!(rows[0].warning, "10,000/sec");
        assert_eq!(rows[0].critical, "1,000/sec");
        assert_eq!(rows[1].warning, "0.70");
        assert_eq!(rows[2].critical, "0.40");
    }
}
