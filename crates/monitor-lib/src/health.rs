//! Health tracking for the monitor
//!
//! Records the status of the sampler and the polling task so the dashboard
//! can show whether the numbers it renders are current.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Health status of a component, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    /// Still producing data, but the last attempt failed or the task is stopped
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::Healthy => write!(f, "healthy"),
            ComponentStatus::Degraded => write!(f, "degraded"),
            ComponentStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ComponentHealth {
    fn new(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            updated_at: Utc::now(),
        }
    }

    pub fn healthy() -> Self {
        Self::new(ComponentStatus::Healthy, None)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::new(ComponentStatus::Degraded, Some(message.into()))
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(ComponentStatus::Unhealthy, Some(message.into()))
    }
}

/// Overall status plus every component, keyed by component name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    fn from_components(components: BTreeMap<String, ComponentHealth>) -> Self {
        let status = components
            .values()
            .map(|health| health.status)
            .max()
            .unwrap_or(ComponentStatus::Healthy);
        Self { status, components }
    }

    /// Message of the worst non-healthy component
    pub fn first_problem(&self) -> Option<&str> {
        self.components
            .values()
            .filter(|h| h.status != ComponentStatus::Healthy)
            .max_by_key(|h| h.status)
            .and_then(|h| h.message.as_deref())
    }
}

/// Component names for health tracking
pub mod components {
    pub const SAMPLER: &str = "sampler";
    pub const POLLER: &str = "poller";
}

/// Shared registry of component health
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<BTreeMap<String, ComponentHealth>>>,
}

impl HealthRegistry {
    /// Registry with the given components already registered as healthy
    pub fn with_components(names: &[&str]) -> Self {
        let components = names
            .iter()
            .map(|name| (name.to_string(), ComponentHealth::healthy()))
            .collect();

        Self {
            components: Arc::new(RwLock::new(components)),
        }
    }

    pub async fn update(&self, name: &str, health: ComponentHealth) {
        self.components
            .write()
            .await
            .insert(name.to_string(), health);
    }

    pub async fn set_healthy(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::degraded(message)).await;
    }

    pub async fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(message)).await;
    }

    pub async fn health(&self) -> HealthResponse {
        HealthResponse::from_components(self.components.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_registry_is_healthy() {
        let health = HealthRegistry::default().health().await;

        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());
        assert_eq!(health.first_problem(), None);
    }

    #[tokio::test]
    async fn test_degraded_sampler() {
        let registry = HealthRegistry::with_components(&[components::SAMPLER, components::POLLER]);
        registry
            .set_degraded(components::SAMPLER, "diagnostics field missing: system")
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Degraded);
        assert_eq!(
            health.first_problem(),
            Some("diagnostics field missing: system")
        );
    }

    #[tokio::test]
    async fn test_worst_component_wins() {
        let registry = HealthRegistry::with_components(&[components::SAMPLER, components::POLLER]);
        registry.set_degraded(components::SAMPLER, "field missing").await;
        registry
            .set_unhealthy(components::POLLER, "Polling task exited")
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert_eq!(health.first_problem(), Some("Polling task exited"));

        registry.set_healthy(components::POLLER).await;
        assert_eq!(registry.health().await.status, ComponentStatus::Degraded);
    }
}
