//! The metrics monitor
//!
//! Owns the metric history, the alert log and the lifetime alert counters.
//! A background polling task is the only writer; snapshots and saves may be
//! taken from the foreground at any time and see state as of the last
//! completed tick.

mod poller;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::alerts::{AlertCounts, AlertLog, ThresholdTable};
use crate::error::{MonitorError, Result};
use crate::health::{components, HealthRegistry, HealthResponse};
use crate::history::MetricHistory;
use crate::models::{Alert, AlertLevel};
use crate::observability::{MonitorMetrics, StructuredLogger};
use crate::persistence::MetricsDocument;
use crate::snapshot::{build_snapshot, Snapshot};
use crate::source::{DiagnosticsProvider, DiagnosticsSource, MetricsSource, SyntheticSource};

use poller::PollerHandle;

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Time between ticks (default: 1 second)
    pub interval: Duration,
    /// How long `stop` waits for the polling task (default: 2 seconds)
    pub stop_timeout: Duration,
    /// Name used in structured logs
    pub name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            stop_timeout: Duration::from_secs(2),
            name: "lfm-monitor".to_string(),
        }
    }
}

/// Mutable monitor state, written only by ticks
#[derive(Debug, Default)]
struct MonitorState {
    history: MetricHistory,
    alerts: AlertLog,
}

/// State shared between the monitor handle and its polling task
pub(crate) struct Shared {
    state: RwLock<MonitorState>,
    source: Arc<dyn MetricsSource>,
    thresholds: ThresholdTable,
    metrics: MonitorMetrics,
    logger: StructuredLogger,
    health: HealthRegistry,
}

impl Shared {
    /// Sample, record and evaluate once
    async fn tick(&self) -> Result<()> {
        // Sample outside the lock so readers are never blocked on the source
        let sample = self.source.sample().await?;
        let raised = self.thresholds.evaluate(&sample);

        let mut state = self.state.write().await;
        state.history.record(&sample);
        for alert in raised {
            self.push_alert(&mut state, alert);
        }
        self.metrics.set_history_samples(state.history.len());

        Ok(())
    }

    /// One tick as run by the polling loop; failures become critical alerts
    pub(crate) async fn run_tick(&self) {
        let start = Instant::now();

        match self.tick().await {
            Ok(()) => {
                self.metrics.inc_ticks();
                self.health.set_healthy(components::SAMPLER).await;
            }
            Err(e) => {
                let message = e.to_string();
                self.metrics.inc_tick_failures();
                self.logger.log_tick_failure(&message);
                self.health.set_degraded(components::SAMPLER, message.clone()).await;

                let mut state = self.state.write().await;
                self.push_alert(
                    &mut state,
                    Alert::new(AlertLevel::Critical, format!("Monitoring error: {}", message)),
                );
            }
        }

        let elapsed = start.elapsed();
        self.metrics.observe_tick_latency(elapsed.as_secs_f64());
        self.logger
            .log_tick(self.state.read().await.history.len(), elapsed.as_millis());
    }

    fn push_alert(&self, state: &mut MonitorState, alert: Alert) {
        self.metrics.inc_alerts(alert.level);
        self.logger.log_alert(alert.level, &alert.message);
        state.alerts.push(alert);
    }
}

/// Periodic metrics monitor with bounded history and threshold alerting
pub struct Monitor {
    shared: Arc<Shared>,
    config: MonitorConfig,
    poller: Mutex<Option<PollerHandle>>,
}

impl Monitor {
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Start polling. Returns false if the monitor was already running.
    pub async fn start(&self) -> bool {
        let mut poller = self.poller.lock().await;
        if poller.as_ref().is_some_and(PollerHandle::is_alive) {
            debug!("Monitor already running, not starting a second poller");
            return false;
        }

        *poller = Some(poller::spawn(self.shared.clone(), self.config.interval));
        self.shared.health.set_healthy(components::POLLER).await;
        self.shared
            .logger
            .log_started(self.shared.source.name(), self.config.interval.as_millis());
        true
    }

    /// Stop polling and wait up to the stop timeout for the task to exit.
    /// A no-op when the monitor is not running.
    pub async fn stop(&self) {
        let Some(handle) = self.poller.lock().await.take() else {
            return;
        };

        handle.cancel.cancel();
        let clean = match tokio::time::timeout(self.config.stop_timeout, handle.task).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                self.shared
                    .health
                    .set_unhealthy(components::POLLER, format!("Polling task failed: {}", e))
                    .await;
                false
            }
            Err(_) => {
                self.shared
                    .health
                    .set_unhealthy(
                        components::POLLER,
                        format!(
                            "Polling task did not stop within {}ms",
                            self.config.stop_timeout.as_millis()
                        ),
                    )
                    .await;
                false
            }
        };

        if clean {
            self.shared
                .health
                .set_degraded(components::POLLER, "Monitor is stopped")
                .await;
        }
        self.shared.logger.log_stopped(
            self.shared.metrics.ticks(),
            self.shared.metrics.tick_failures(),
            clean,
        );
    }

    pub async fn is_running(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(PollerHandle::is_alive)
    }

    /// Run a single tick directly, propagating any sampling error
    pub async fn tick(&self) -> Result<()> {
        self.shared.tick().await
    }

    /// Raise an alert outside the threshold evaluator
    pub async fn add_alert(&self, level: AlertLevel, message: impl Into<String>) {
        let mut state = self.shared.state.write().await;
        self.shared.push_alert(&mut state, Alert::new(level, message));
    }

    /// Current dashboard view
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.shared.state.read().await;
        build_snapshot(&state.history, &state.alerts)
    }

    pub async fn alert_counts(&self) -> AlertCounts {
        self.shared.state.read().await.alerts.counts()
    }

    /// Copy of the full history and alert state in its persisted form
    pub async fn document(&self) -> MetricsDocument {
        let state = self.shared.state.read().await;
        MetricsDocument::capture(&state.history, &state.alerts)
    }

    /// Write the full history and alert state to `path`, overwriting it
    pub async fn save_metrics(&self, path: impl AsRef<Path>) -> Result<()> {
        let document = self.document().await;
        document.save(path.as_ref()).await?;
        self.shared.logger.log_saved(
            &path.as_ref().display().to_string(),
            document.metrics_history.timestamps.len(),
            document.alerts.len(),
        );
        Ok(())
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.shared.thresholds
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Component health; a polling task that exited on its own is unhealthy
    pub async fn health(&self) -> HealthResponse {
        let exited = self
            .poller
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_alive());
        if exited {
            self.shared
                .health
                .set_unhealthy(components::POLLER, "Polling task exited")
                .await;
        }
        self.shared.health.health().await
    }

    /// Self-metrics in the Prometheus text exposition format
    pub fn metrics_text(&self) -> Result<String> {
        self.shared.metrics.encode_text()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.get_mut().take() {
            handle.cancel.cancel();
        }
    }
}

/// Builder for creating a monitor
pub struct MonitorBuilder {
    source: Option<Arc<dyn MetricsSource>>,
    seed: Option<u64>,
    thresholds: ThresholdTable,
    config: MonitorConfig,
    restore: Option<MetricsDocument>,
}

impl MonitorBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            source: None,
            seed: None,
            thresholds: ThresholdTable::default(),
            config: MonitorConfig::default(),
            restore: None,
        }
    }

    /// Set the metrics source (defaults to a synthetic source)
    pub fn source(mut self, source: Arc<dyn MetricsSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sample from a live system's diagnostics
    pub fn diagnostics(self, provider: Arc<dyn DiagnosticsProvider>) -> Self {
        self.source(Arc::new(DiagnosticsSource::new(provider)))
    }

    /// Seed for the synthetic source used when no source is set
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.config.stop_timeout = timeout;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Start from a previously saved document
    pub fn restore(mut self, document: MetricsDocument) -> Self {
        self.restore = Some(document);
        self
    }

    /// Build the monitor in the stopped state
    pub fn build(self) -> Result<Monitor> {
        if self.config.interval.is_zero() {
            return Err(MonitorError::Config(
                "polling interval must be greater than zero".to_string(),
            ));
        }

        let source: Arc<dyn MetricsSource> = match (self.source, self.seed) {
            (Some(source), _) => source,
            (None, Some(seed)) => Arc::new(SyntheticSource::seeded(seed)),
            (None, None) => Arc::new(SyntheticSource::from_entropy()),
        };

        let state = match self.restore {
            Some(document) => {
                let (history, alerts) = document.restore()?;
                MonitorState { history, alerts }
            }
            None => MonitorState::default(),
        };

        let metrics = MonitorMetrics::new()?;
        metrics.set_history_samples(state.history.len());

        let shared = Shared {
            state: RwLock::new(state),
            source,
            thresholds: self.thresholds,
            metrics,
            logger: StructuredLogger::new(self.config.name.clone()),
            health: HealthRegistry::with_components(&[components::SAMPLER, components::POLLER]),
        };

        Ok(Monitor {
            shared: Arc::new(shared),
            config: self.config,
            poller: Mutex::new(None),
        })
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_with, MetricSample, Trend};
    use crate::source::{async_trait, full_diagnostics};
    use crate::health::ComponentStatus;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that always reports the same rates
    struct FixedSource {
        operations_rate: f64,
        cache_hit_rate: f64,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(operations_rate: f64, cache_hit_rate: f64) -> Self {
            Self {
                operations_rate,
                cache_hit_rate,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MetricsSource for FixedSource {
        async fn sample(&self) -> Result<MetricSample> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_with(self.operations_rate, self.cache_hit_rate))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    /// Provider whose document lacks the system section
    struct IncompleteProvider;

    #[async_trait]
    impl DiagnosticsProvider for IncompleteProvider {
        async fn system_diagnostics(&self) -> Result<Value> {
            let mut doc = full_diagnostics(80_000.0, 0.9);
            doc.as_object_mut().unwrap().remove("system");
            Ok(doc)
        }
    }

    /// Source that never returns within a test's lifetime
    struct HangingSource;

    #[async_trait]
    impl MetricsSource for HangingSource {
        async fn sample(&self) -> Result<MetricSample> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(sample_with(80_000.0, 0.9))
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    /// Provider reporting axiom counts whose combined total exceeds u64
    struct HugeAxiomProvider;

    #[async_trait]
    impl DiagnosticsProvider for HugeAxiomProvider {
        async fn system_diagnostics(&self) -> Result<Value> {
            let mut doc = full_diagnostics(80_000.0, 0.9);
            doc["physics_axioms"] = serde_json::json!({"a": u64::MAX});
            doc["ai_axioms"] = serde_json::json!({"b": 1});
            Ok(doc)
        }
    }

    /// Source that fails on every other call
    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetricsSource for FlakySource {
        async fn sample(&self) -> Result<MetricSample> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 1 {
                return Err(MonitorError::Provider("connection reset".to_string()));
            }
            Ok(sample_with(80_000.0 + call as f64, 0.9))
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    async fn assert_aligned(monitor: &Monitor) {
        let state = monitor.shared.state.read().await;
        assert!(state.history.is_aligned(), "history series out of step");
    }

    fn fixed_monitor(operations_rate: f64, cache_hit_rate: f64) -> Monitor {
        Monitor::builder()
            .source(Arc::new(FixedSource::new(operations_rate, cache_hit_rate)))
            .interval(Duration::from_millis(10))
            .build()
            .unwrap()
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let result = Monitor::builder().interval(Duration::ZERO).build();
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[tokio::test]
    async fn test_fresh_monitor_has_no_data() {
        let monitor = Monitor::builder().seed(1).build().unwrap();
        assert_eq!(monitor.snapshot().await, Snapshot::NoData);
        assert!(!monitor.is_running().await);
    }

    #[tokio::test]
    async fn test_one_tick_gives_stable_trends() {
        let monitor = Monitor::builder().seed(1).build().unwrap();
        monitor.tick().await.unwrap();

        let snapshot = monitor.snapshot().await;
        let data = snapshot.data().expect("snapshot should have data");
        assert_eq!(data.trends.operations, Trend::Stable);
        assert_eq!(data.trends.cache, Trend::Stable);
        assert_eq!(data.trends.confidence, Trend::Stable);
        assert!(data.current.operations_rate >= 50_000.0);
    }

    #[tokio::test]
    async fn test_tick_raises_threshold_alerts() {
        let monitor = fixed_monitor(500.0, 0.9);
        monitor.tick().await.unwrap();
        monitor.tick().await.unwrap();

        let counts = monitor.alert_counts().await;
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.warning, 0);
    }

    #[tokio::test]
    async fn test_missing_field_propagates_from_tick() {
        let monitor = Monitor::builder()
            .diagnostics(Arc::new(IncompleteProvider))
            .build()
            .unwrap();

        let err = monitor.tick().await.unwrap_err();
        assert!(matches!(err, MonitorError::MissingField(ref p) if p == "system.total_operations"));

        // A direct tick does not record an alert; only the polling loop does
        assert_eq!(monitor.alert_counts().await.critical, 0);
    }

    #[tokio::test]
    async fn test_loop_converts_failures_into_alerts_and_continues() {
        let monitor = Monitor::builder()
            .diagnostics(Arc::new(IncompleteProvider))
            .interval(Duration::from_millis(10))
            .build()
            .unwrap();

        assert!(monitor.start().await);
        tokio::time::sleep(Duration::from_millis(100)).await;
        monitor.stop().await;

        let counts = monitor.alert_counts().await;
        assert!(counts.critical >= 2, "loop should keep ticking after failures");
        assert_eq!(monitor.snapshot().await, Snapshot::NoData);

        let document = monitor.document().await;
        assert!(document.alerts[0]
            .message
            .starts_with("Monitoring error: diagnostics field missing"));

        let health = monitor.health().await;
        assert_eq!(health.status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_loop_survives_saturating_axiom_totals() {
        let monitor = Monitor::builder()
            .diagnostics(Arc::new(HugeAxiomProvider))
            .interval(Duration::from_millis(10))
            .build()
            .unwrap();

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(monitor.is_running().await);
        monitor.stop().await;

        let snapshot = monitor.snapshot().await;
        let data = snapshot.data().expect("ticks should have recorded samples");
        assert_eq!(data.current.axiom_usage, u64::MAX);
        assert_eq!(monitor.alert_counts().await.critical, 0);
        assert_aligned(&monitor).await;

        let health = monitor.health().await;
        assert_ne!(health.status, ComponentStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_history_stays_aligned_across_failures_and_restore() {
        let monitor = Monitor::builder()
            .source(Arc::new(FlakySource {
                calls: AtomicUsize::new(0),
            }))
            .interval(Duration::from_millis(10))
            .build()
            .unwrap();

        let mut results = Vec::new();
        for _ in 0..6 {
            results.push(monitor.tick().await.is_ok());
        }
        assert_eq!(results, vec![true, false, true, false, true, false]);
        assert_aligned(&monitor).await;

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        monitor.stop().await;
        assert_aligned(&monitor).await;
        assert!(monitor.alert_counts().await.critical >= 1);

        let document = monitor.document().await;
        let recorded = document.metrics_history.timestamps.len();
        let restored = Monitor::builder().restore(document).build().unwrap();
        assert_aligned(&restored).await;
        assert_eq!(restored.shared.state.read().await.history.len(), recorded);
    }

    #[tokio::test]
    async fn test_restore_rejects_misaligned_document() {
        let monitor = fixed_monitor(80_000.0, 0.9);
        monitor.tick().await.unwrap();
        monitor.tick().await.unwrap();

        let mut document = monitor.document().await;
        document.metrics_history.cache_hit_rate.pop();

        let result = Monitor::builder().restore(document).build();
        assert!(matches!(result, Err(MonitorError::InvalidField { .. })));
    }

    #[tokio::test]
    async fn test_start_twice_spawns_one_poller() {
        let source = Arc::new(FixedSource::new(80_000.0, 0.9));
        let monitor = Monitor::builder()
            .source(source.clone())
            .interval(Duration::from_millis(50))
            .build()
            .unwrap();

        assert!(monitor.start().await);
        assert!(!monitor.start().await);
        assert!(monitor.is_running().await);

        tokio::time::sleep(Duration::from_millis(120)).await;
        monitor.stop().await;

        // One poller at 50ms over ~120ms: the immediate tick plus two more
        let calls = source.calls.load(Ordering::SeqCst);
        assert!((2..=4).contains(&calls), "unexpected tick count {}", calls);
    }

    #[tokio::test]
    async fn test_stop_when_stopped_is_noop() {
        let monitor = fixed_monitor(80_000.0, 0.9);
        monitor.stop().await;
        assert!(!monitor.is_running().await);

        monitor.start().await;
        monitor.stop().await;
        monitor.stop().await;
        assert!(!monitor.is_running().await);
    }

    #[tokio::test]
    async fn test_no_ticks_after_stop() {
        let source = Arc::new(FixedSource::new(80_000.0, 0.9));
        let monitor = Monitor::builder()
            .source(source.clone())
            .interval(Duration::from_millis(10))
            .build()
            .unwrap();

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        monitor.stop().await;

        let after_stop = source.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_stop_wait_is_bounded() {
        let monitor = Monitor::builder()
            .source(Arc::new(HangingSource))
            .interval(Duration::from_millis(10))
            .stop_timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        let started = Instant::now();
        monitor.stop().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!monitor.is_running().await);

        let health = monitor.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert_eq!(
            health.first_problem(),
            Some("Polling task did not stop within 50ms")
        );
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let monitor = fixed_monitor(80_000.0, 0.9);
        assert!(monitor.start().await);
        monitor.stop().await;
        assert_eq!(
            monitor.health().await.first_problem(),
            Some("Monitor is stopped")
        );

        assert!(monitor.start().await);
        monitor.stop().await;
    }

    #[tokio::test]
    async fn test_snapshot_while_running() {
        let monitor = fixed_monitor(5_000.0, 0.9);
        monitor.start().await;

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(15)).await;
            let _ = monitor.snapshot().await;
        }
        monitor.stop().await;

        let snapshot = monitor.snapshot().await;
        let data = snapshot.data().unwrap();
        assert!(data.alerts.counts.warning >= 1);
        assert!(data.alerts.recent.len() <= crate::alerts::RECENT_ALERTS);
    }

    #[tokio::test]
    async fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard_metrics.json");

        let monitor = fixed_monitor(5_000.0, 0.6);
        for _ in 0..3 {
            monitor.tick().await.unwrap();
        }
        monitor.save_metrics(&path).await.unwrap();

        let document = MetricsDocument::load(&path).await.unwrap();
        let restored = Monitor::builder().restore(document).build().unwrap();

        assert_eq!(restored.snapshot().await, monitor.snapshot().await);
        assert_eq!(restored.alert_counts().await.warning, 6);
    }

    #[tokio::test]
    async fn test_add_alert_counts_info() {
        let monitor = fixed_monitor(80_000.0, 0.9);
        monitor.add_alert(AlertLevel::Info, "Dashboard opened").await;
        assert_eq!(monitor.alert_counts().await.info, 1);
    }

    #[tokio::test]
    async fn test_metrics_text_counts_ticks() {
        let monitor = fixed_monitor(80_000.0, 0.9);
        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        monitor.stop().await;

        let text = monitor.metrics_text().unwrap();
        assert!(text.contains("lfm_monitor_ticks_total"));
        assert!(text.contains("lfm_monitor_history_samples"));
    }
}
