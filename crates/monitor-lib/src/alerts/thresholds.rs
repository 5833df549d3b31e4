//! Threshold table and severity classification

use serde::{Deserialize, Serialize};

use crate::models::{Alert, AlertLevel, MetricSample};

/// Warning and critical cutoffs for a metric; values below a cutoff trigger it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub warning: f64,
    pub critical: f64,
}

impl Threshold {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    /// Severity for `value`; critical takes precedence over warning
    pub fn classify(&self, value: f64) -> Option<AlertLevel> {
        if value < self.critical {
            Some(AlertLevel::Critical)
        } else if value < self.warning {
            Some(AlertLevel::Warning)
        } else {
            None
        }
    }
}

/// Metrics checked against the threshold table on every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoredMetric {
    OperationsRate,
    CacheHitRate,
}

impl MonitoredMetric {
    pub const ALL: [MonitoredMetric; 2] =
        [MonitoredMetric::OperationsRate, MonitoredMetric::CacheHitRate];

    pub fn value(&self, sample: &MetricSample) -> f64 {
        match self {
            MonitoredMetric::OperationsRate => sample.operations_rate,
            MonitoredMetric::CacheHitRate => sample.cache_hit_rate,
        }
    }

    fn message(&self, level: AlertLevel, value: f64) -> String {
        match (self, level) {
            (MonitoredMetric::OperationsRate, AlertLevel::Critical) => {
                format!("Operations rate critically low: {:.0}/sec", value)
            }
            (MonitoredMetric::OperationsRate, _) => {
                format!("Operations rate low: {:.0}/sec", value)
            }
            (MonitoredMetric::CacheHitRate, AlertLevel::Critical) => {
                format!("Cache hit rate critical: {:.1}%", value * 100.0)
            }
            (MonitoredMetric::CacheHitRate, _) => {
                format!("Cache hit rate low: {:.1}%", value * 100.0)
            }
        }
    }
}

impl std::fmt::Display for MonitoredMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitoredMetric::OperationsRate => write!(f, "operations_rate"),
            MonitoredMetric::CacheHitRate => write!(f, "cache_hit_rate"),
        }
    }
}

/// Static metric cutoffs, read-only once a monitor is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    pub operations_rate: Threshold,
    pub cache_hit_rate: Threshold,
    /// Only used to color the confidence score on the dashboard
    pub confidence: Threshold,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            operations_rate: Threshold::new(10_000.0, 1_000.0),
            cache_hit_rate: Threshold::new(0.7, 0.5),
            confidence: Threshold::new(0.6, 0.4),
        }
    }
}

impl ThresholdTable {
    pub fn get(&self, metric: MonitoredMetric) -> &Threshold {
        match metric {
            MonitoredMetric::OperationsRate => &self.operations_rate,
            MonitoredMetric::CacheHitRate => &self.cache_hit_rate,
        }
    }

    /// Alerts for a sample, at most one per monitored metric
    pub fn evaluate(&self, sample: &MetricSample) -> Vec<Alert> {
        MonitoredMetric::ALL
            .iter()
            .filter_map(|metric| {
                let value = metric.value(sample);
                self.get(*metric)
                    .classify(value)
                    .map(|level| Alert::new(level, metric.message(level, value)))
            })
            .collect()
    }

    /// Named rows, in display order
    pub fn rows(&self) -> Vec<(&'static str, Threshold)> {
        vec![
            ("operations_rate", self.operations_rate),
            ("cache_hit_rate", self.cache_hit_rate),
            ("confidence", self.confidence),
        ]
    }
}
