//! Bounded alert log with lifetime counters

use serde::{Deserialize, Serialize};

use crate::history::BoundedSeries;
use crate::models::{Alert, AlertLevel};

/// Number of alerts retained
pub const ALERT_CAPACITY: usize = 50;

/// Number of alerts shown as "recent"
pub const RECENT_ALERTS: usize = 5;

/// Lifetime alert totals per level; never decremented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounts {
    pub info: u64,
    pub warning: u64,
    pub critical: u64,
}

impl AlertCounts {
    pub fn increment(&mut self, level: AlertLevel) {
        match level {
            AlertLevel::Info => self.info += 1,
            AlertLevel::Warning => self.warning += 1,
            AlertLevel::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, level: AlertLevel) -> u64 {
        match level {
            AlertLevel::Info => self.info,
            AlertLevel::Warning => self.warning,
            AlertLevel::Critical => self.critical,
        }
    }

    pub fn total(&self) -> u64 {
        self.info + self.warning + self.critical
    }
}

/// Recent alerts plus lifetime counts
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: BoundedSeries<Alert>,
    counts: AlertCounts,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::with_capacity(ALERT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: BoundedSeries::new(capacity),
            counts: AlertCounts::default(),
        }
    }

    /// Rebuild a log from persisted alerts and counters
    pub fn restore(alerts: impl IntoIterator<Item = Alert>, counts: AlertCounts) -> Self {
        let mut log = Self::new();
        log.alerts.extend(alerts);
        log.counts = counts;
        log
    }

    /// Append an alert and bump its level's lifetime counter
    pub fn push(&mut self, alert: Alert) {
        self.counts.increment(alert.level);
        self.alerts.push(alert);
    }

    /// Up to `n` most recent alerts, most recent last
    pub fn recent(&self, n: usize) -> Vec<Alert> {
        self.alerts.tail(n).cloned().collect()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.to_vec()
    }

    pub fn counts(&self) -> AlertCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new()
    }
}
