//! Metric sources
//!
//! A tick pulls exactly one [`MetricSample`] from a [`MetricsSource`]. Two
//! sources are provided:
//! - [`DiagnosticsSource`] reads a live system's nested diagnostics document
//! - [`SyntheticSource`] generates plausible demo values from a seedable RNG

mod diagnostics;
mod synthetic;

pub use diagnostics::{
    extract_sample, DiagnosticsProvider, DiagnosticsSource, FileDiagnosticsProvider,
};
pub use synthetic::SyntheticSource;

pub use async_trait::async_trait;

use crate::error::Result;
use crate::models::MetricSample;

/// Produces one metric sample per tick
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn sample(&self) -> Result<MetricSample>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub(crate) use diagnostics::full_diagnostics;
