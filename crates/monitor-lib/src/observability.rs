//! Observability infrastructure for the monitor
//!
//! Provides:
//! - Prometheus self-metrics (tick latency, tick failures, alerts by level, history size)
//! - Structured logging of monitor events with tracing

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::AlertLevel;

/// Histogram buckets for tick latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Prometheus metrics owned by one monitor.
///
/// Each instance has its own registry, so several monitors can live in one
/// process. Clones share the same underlying metrics.
#[derive(Clone)]
pub struct MonitorMetrics {
    registry: Registry,
    tick_latency_seconds: Histogram,
    ticks: IntCounter,
    tick_failures: IntCounter,
    alerts: IntCounterVec,
    history_samples: IntGauge,
}

impl MonitorMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let tick_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "lfm_monitor_tick_latency_seconds",
                "Time spent sampling, recording and evaluating one tick",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
        )?;
        let ticks = IntCounter::new("lfm_monitor_ticks_total", "Total number of completed ticks")?;
        let tick_failures = IntCounter::new(
            "lfm_monitor_tick_failures_total",
            "Total number of ticks that failed",
        )?;
        let alerts = IntCounterVec::new(
            Opts::new("lfm_monitor_alerts_total", "Total number of alerts raised"),
            &["level"],
        )?;
        let history_samples = IntGauge::new(
            "lfm_monitor_history_samples",
            "Number of samples currently retained in history",
        )?;

        registry.register(Box::new(tick_latency_seconds.clone()))?;
        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(tick_failures.clone()))?;
        registry.register(Box::new(alerts.clone()))?;
        registry.register(Box::new(history_samples.clone()))?;

        Ok(Self {
            registry,
            tick_latency_seconds,
            ticks,
            tick_failures,
            alerts,
            history_samples,
        })
    }

    pub fn observe_tick_latency(&self, duration_secs: f64) {
        self.tick_latency_seconds.observe(duration_secs);
    }

    pub fn inc_ticks(&self) {
        self.ticks.inc();
    }

    pub fn inc_tick_failures(&self) {
        self.tick_failures.inc();
    }

    pub fn inc_alerts(&self, level: AlertLevel) {
        self.alerts.with_label_values(&[level.as_str()]).inc();
    }

    pub fn set_history_samples(&self, count: usize) {
        self.history_samples.set(count as i64);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    pub fn tick_failures(&self) -> u64 {
        self.tick_failures.get()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Structured logger for monitor events
#[derive(Clone)]
pub struct StructuredLogger {
    monitor_name: String,
}

impl StructuredLogger {
    pub fn new(monitor_name: impl Into<String>) -> Self {
        Self {
            monitor_name: monitor_name.into(),
        }
    }

    pub fn log_started(&self, source: &str, interval_ms: u128) {
        info!(
            event = "monitor_started",
            monitor = %self.monitor_name,
            source = %source,
            interval_ms = interval_ms,
            "Monitoring started"
        );
    }

    pub fn log_stopped(&self, ticks: u64, failures: u64, clean: bool) {
        if clean {
            info!(
                event = "monitor_stopped",
                monitor = %self.monitor_name,
                ticks = ticks,
                failures = failures,
                "Monitoring stopped"
            );
        } else {
            warn!(
                event = "monitor_stopped",
                monitor = %self.monitor_name,
                ticks = ticks,
                failures = failures,
                "Polling task did not finish within the stop timeout, detaching it"
            );
        }
    }

    pub fn log_alert(&self, level: AlertLevel, message: &str) {
        match level {
            AlertLevel::Critical => {
                warn!(
                    event = "alert_raised",
                    monitor = %self.monitor_name,
                    level = %level,
                    message = %message,
                    "Critical alert raised"
                );
            }
            _ => {
                info!(
                    event = "alert_raised",
                    monitor = %self.monitor_name,
                    level = %level,
                    message = %message,
                    "Alert raised"
                );
            }
        }
    }

    pub fn log_tick_failure(&self, error: &str) {
        warn!(
            event = "tick_failed",
            monitor = %self.monitor_name,
            error = %error,
            "Monitoring tick failed"
        );
    }

    pub fn log_tick(&self, samples: usize, elapsed_ms: u128) {
        debug!(
            event = "tick_complete",
            monitor = %self.monitor_name,
            samples = samples,
            elapsed_ms = elapsed_ms,
            "Tick complete"
        );
    }

    pub fn log_saved(&self, path: &str, samples: usize, alerts: usize) {
        info!(
            event = "metrics_saved",
            monitor = %self.monitor_name,
            path = %path,
            samples = samples,
            alerts = alerts,
            "Metrics saved"
        );
    }
}
