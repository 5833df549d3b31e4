//! JSON persistence of metric history and alerts
//!
//! The saved document carries every history series, the retained alerts and
//! the lifetime alert counters. Saving always overwrites the target file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{AlertCounts, AlertLog};
use crate::error::{MonitorError, Result};
use crate::history::MetricHistory;
use crate::models::Alert;

/// On-disk form of the monitor state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDocument {
    /// When the document was written
    pub timestamp: DateTime<Utc>,
    pub metrics_history: HistoryDocument,
    pub alerts: Vec<Alert>,
    pub alert_counts: AlertCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    pub operations_rate: Vec<f64>,
    pub cache_hit_rate: Vec<f64>,
    pub confidence_scores: Vec<f64>,
    pub axiom_usage: Vec<u64>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl HistoryDocument {
    fn check_aligned(&self) -> Result<()> {
        let expected = self.timestamps.len();
        let lengths = [
            ("operations_rate", self.operations_rate.len()),
            ("cache_hit_rate", self.cache_hit_rate.len()),
            ("confidence_scores", self.confidence_scores.len()),
            ("axiom_usage", self.axiom_usage.len()),
        ];

        match lengths.iter().find(|(_, len)| *len != expected) {
            Some((name, len)) => Err(MonitorError::InvalidField {
                path: format!("metrics_history.{}", name),
                reason: format!("has {} entries but there are {} timestamps", len, expected),
            }),
            None => Ok(()),
        }
    }
}

impl MetricsDocument {
    pub fn capture(history: &MetricHistory, alerts: &AlertLog) -> Self {
        Self {
            timestamp: Utc::now(),
            metrics_history: HistoryDocument {
                operations_rate: history.operations_rate.to_vec(),
                cache_hit_rate: history.cache_hit_rate.to_vec(),
                confidence_scores: history.confidence_score.to_vec(),
                axiom_usage: history.axiom_usage.to_vec(),
                timestamps: history.timestamps.to_vec(),
            },
            alerts: alerts.alerts(),
            alert_counts: alerts.counts(),
        }
    }

    /// Rebuild bounded history and alert log from the document.
    ///
    /// Fails if the history series do not all have the same length.
    pub fn restore(&self) -> Result<(MetricHistory, AlertLog)> {
        let series = &self.metrics_history;
        series.check_aligned()?;

        let mut history = MetricHistory::new();
        history.timestamps.extend(series.timestamps.iter().copied());
        history.operations_rate.extend(series.operations_rate.iter().copied());
        history.cache_hit_rate.extend(series.cache_hit_rate.iter().copied());
        history.confidence_score.extend(series.confidence_scores.iter().copied());
        history.axiom_usage.extend(series.axiom_usage.iter().copied());

        let alerts = AlertLog::restore(self.alerts.iter().cloned(), self.alert_counts);
        Ok((history, alerts))
    }

    /// Write the document as pretty JSON, replacing any existing file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path.as_ref(), content).await?;
        Ok(())
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
