//! Dashboard snapshots
//!
//! A snapshot is a read-only, point-in-time aggregation of the metric history
//! and alert log, computed on demand for the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{AlertCounts, AlertLog, RECENT_ALERTS};
use crate::history::MetricHistory;
use crate::models::{Alert, Trend};
use crate::trend::calculate_trend;

/// Snapshot result; callers must check for [`Snapshot::NoData`] first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Snapshot {
    /// No sample has been recorded yet
    NoData,
    Available(DashboardData),
}

impl Snapshot {
    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            Snapshot::NoData => None,
            Snapshot::Available(data) => Some(data),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Snapshot::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub timestamp: DateTime<Utc>,
    pub current: CurrentValues,
    pub statistics: Statistics,
    pub trends: Trends,
    pub alerts: AlertSummary,
}

/// Latest value of each tracked series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentValues {
    pub operations_rate: f64,
    pub cache_hit_rate: f64,
    pub confidence: f64,
    pub axiom_usage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub avg_operations_rate: f64,
    pub max_operations_rate: f64,
    pub min_operations_rate: f64,
    pub avg_cache_hit_rate: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub operations: Trend,
    pub cache: Trend,
    pub confidence: Trend,
}

impl Trends {
    /// Display label and trend, in display order
    pub fn rows(&self) -> [(&'static str, Trend); 3] {
        [
            ("Operations Trend", self.operations),
            ("Cache Trend", self.cache),
            ("Confidence Trend", self.confidence),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    /// Most recent alerts, most recent last
    pub recent: Vec<Alert>,
    pub counts: AlertCounts,
}

/// Assemble a snapshot from the current history and alert state
pub fn build_snapshot(history: &MetricHistory, alerts: &AlertLog) -> Snapshot {
    let Some(timestamp) = history.latest_timestamp() else {
        return Snapshot::NoData;
    };

    let ops_rates = history.operations_rate.to_vec();
    let cache_rates = history.cache_hit_rate.to_vec();
    let confidence = history.confidence_score.to_vec();

    Snapshot::Available(DashboardData {
        timestamp,
        current: CurrentValues {
            operations_rate: ops_rates.last().copied().unwrap_or(0.0),
            cache_hit_rate: cache_rates.last().copied().unwrap_or(0.0),
            confidence: confidence.last().copied().unwrap_or(0.0),
            axiom_usage: history.axiom_usage.last().copied().unwrap_or(0),
        },
        statistics: Statistics {
            avg_operations_rate: mean(&ops_rates),
            max_operations_rate: ops_rates.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min_operations_rate: ops_rates.iter().copied().fold(f64::INFINITY, f64::min),
            avg_cache_hit_rate: mean(&cache_rates),
            avg_confidence: mean(&confidence),
        },
        trends: Trends {
            operations: calculate_trend(&ops_rates),
            cache: calculate_trend(&cache_rates),
            confidence: calculate_trend(&confidence),
        },
        alerts: AlertSummary {
            recent: alerts.recent(RECENT_ALERTS),
            counts: alerts.counts(),
        },
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
