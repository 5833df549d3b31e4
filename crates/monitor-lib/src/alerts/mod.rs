//! Threshold alerting
//!
//! This module provides:
//! - The static threshold table and per-metric severity classification
//! - The bounded alert log with lifetime per-level counters

mod log;
mod thresholds;

pub use log::{AlertCounts, AlertLog, ALERT_CAPACITY, RECENT_ALERTS};
pub use thresholds::{MonitoredMetric, Threshold, ThresholdTable};
