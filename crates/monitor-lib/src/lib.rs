//! Monitoring library for the LFM AI upgrade system
//!
//! This crate provides the core functionality for:
//! - Sampling metrics from a diagnostics provider (or a synthetic generator)
//! - Bounded metric and alert history
//! - Threshold alerting and trend estimation
//! - Dashboard snapshots and JSON persistence
//! - Health checks and observability

pub mod alerts;
pub mod error;
pub mod health;
pub mod history;
pub mod models;
pub mod monitor;
pub mod observability;
pub mod persistence;
pub mod snapshot;
pub mod source;
pub mod trend;

pub use error::{MonitorError, Result};
pub use health::{ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse};
pub use models::*;
pub use monitor::{Monitor, MonitorBuilder, MonitorConfig};
pub use observability::{MonitorMetrics, StructuredLogger};
pub use snapshot::{DashboardData, Snapshot};
