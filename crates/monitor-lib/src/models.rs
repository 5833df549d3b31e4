//! Core data models for the monitor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Factor applied to the cache hit rate to derive the confidence score
pub const CONFIDENCE_FACTOR: f64 = 1.2;

/// Point-in-time metrics reading, produced once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    pub operations_rate: f64,
    pub cache_hit_rate: f64,
    pub total_operations: u64,
    pub physics_axiom_count: u64,
    pub ai_axiom_count: u64,
    pub reasoning_count: u64,
    pub uncertainty_ack_count: u64,
}

impl MetricSample {
    /// Confidence derived from the cache hit rate, clamped to 1.0
    pub fn confidence(&self) -> f64 {
        (self.cache_hit_rate * CONFIDENCE_FACTOR).min(1.0)
    }

    /// Combined physics and AI axiom count, saturating at `u64::MAX`
    pub fn axiom_usage(&self) -> u64 {
        self.physics_axiom_count.saturating_add(self.ai_axiom_count)
    }
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 3] = [AlertLevel::Info, AlertLevel::Warning, AlertLevel::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// Short-term direction of a metric series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    /// Arrow used by the console dashboard
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Improving => "↑",
            Trend::Declining => "↓",
            Trend::Stable => "→",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_with(operations_rate: f64, cache_hit_rate: f64) -> MetricSample {
    MetricSample {
        timestamp: Utc::now(),
        operations_rate,
        cache_hit_rate,
        total_operations: 1_000,
        physics_axiom_count: 300,
        ai_axiom_count: 700,
        reasoning_count: 42,
        uncertainty_ack_count: 3,
    }
}
