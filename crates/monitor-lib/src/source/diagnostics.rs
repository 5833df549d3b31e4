//! Sampling from a live system's diagnostics document

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::{async_trait, MetricsSource};
use crate::error::{MonitorError, Result};
use crate::models::MetricSample;

const OPERATIONS_RATE: &str = "performance.current_rate";
const CACHE_HIT_RATE: &str = "neural_tier1.hit_rate";
const TOTAL_OPERATIONS: &str = "system.total_operations";
const PHYSICS_AXIOMS: &str = "physics_axioms";
const AI_AXIOMS: &str = "ai_axioms";
const REASONING_COUNT: &str = "executive_tier2.reasoning_count";
const UNCERTAINTY_ACKS: &str = "humility.uncertainty_acknowledgments";

/// Read accessor of the monitored system; never written to
#[async_trait]
pub trait DiagnosticsProvider: Send + Sync {
    /// Current nested diagnostics document
    async fn system_diagnostics(&self) -> Result<Value>;
}

/// Metrics source backed by a diagnostics provider
pub struct DiagnosticsSource {
    provider: Arc<dyn DiagnosticsProvider>,
}

impl DiagnosticsSource {
    pub fn new(provider: Arc<dyn DiagnosticsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl MetricsSource for DiagnosticsSource {
    async fn sample(&self) -> Result<MetricSample> {
        let diagnostics = self.provider.system_diagnostics().await?;
        extract_sample(&diagnostics)
    }

    fn name(&self) -> &'static str {
        "diagnostics"
    }
}

/// Build a sample from a diagnostics document; every field is required
pub fn extract_sample(diagnostics: &Value) -> Result<MetricSample> {
    Ok(MetricSample {
        timestamp: Utc::now(),
        operations_rate: float_at(diagnostics, OPERATIONS_RATE)?,
        cache_hit_rate: float_at(diagnostics, CACHE_HIT_RATE)?,
        total_operations: count_at(diagnostics, TOTAL_OPERATIONS)?,
        physics_axiom_count: sum_of_counts(diagnostics, PHYSICS_AXIOMS)?,
        ai_axiom_count: sum_of_counts(diagnostics, AI_AXIOMS)?,
        reasoning_count: count_at(diagnostics, REASONING_COUNT)?,
        uncertainty_ack_count: count_at(diagnostics, UNCERTAINTY_ACKS)?,
    })
}

fn lookup<'a>(root: &'a Value, path: &str) -> Result<&'a Value> {
    path.split('.')
        .try_fold(root, |node, key| node.get(key))
        .ok_or_else(|| MonitorError::MissingField(path.to_string()))
}

fn float_at(root: &Value, path: &str) -> Result<f64> {
    lookup(root, path)?
        .as_f64()
        .ok_or_else(|| MonitorError::InvalidField {
            path: path.to_string(),
            reason: "expected a number".to_string(),
        })
}

fn as_count(value: &Value, path: &str) -> Result<u64> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        _ => Err(MonitorError::InvalidField {
            path: path.to_string(),
            reason: "expected a non-negative integer".to_string(),
        }),
    }
}

fn count_at(root: &Value, path: &str) -> Result<u64> {
    as_count(lookup(root, path)?, path)
}

/// Sum every value of a per-axiom usage map
fn sum_of_counts(root: &Value, path: &str) -> Result<u64> {
    let map = lookup(root, path)?
        .as_object()
        .ok_or_else(|| MonitorError::InvalidField {
            path: path.to_string(),
            reason: "expected a map of counts".to_string(),
        })?;

    map.iter().try_fold(0u64, |total, (key, value)| {
        let count = as_count(value, &format!("{}.{}", path, key))?;
        total
            .checked_add(count)
            .ok_or_else(|| MonitorError::InvalidField {
                path: path.to_string(),
                reason: "sum of counts overflows".to_string(),
            })
    })
}

/// Provider that re-reads a JSON diagnostics file on every tick
#[derive(Debug, Clone)]
pub struct FileDiagnosticsProvider {
    path: PathBuf,
}

impl FileDiagnosticsProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DiagnosticsProvider for FileDiagnosticsProvider {
    async fn system_diagnostics(&self) -> Result<Value> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
pub(crate) fn full_diagnostics(current_rate: f64, hit_rate: f64) -> Value {
    serde_json::json!({
        "performance": {"current_rate": current_rate},
        "neural_tier1": {"hit_rate": hit_rate},
        "system": {"total_operations": 123_456},
        "physics_axioms": {"conservation": 120, "causality": 80},
        "ai_axioms": {"alignment": 400, "humility": 100},
        "executive_tier2": {"reasoning_count": 17},
        "humility": {"uncertainty_acknowledgments": 4}
    })
}
