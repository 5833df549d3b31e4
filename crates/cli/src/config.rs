//! Configuration management for the CLI

use anyhow::{Context, Result};
use monitor_lib::alerts::ThresholdTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix, e.g. `LFM_MONITOR_INTERVAL_MS`
const ENV_PREFIX: &str = "LFM_MONITOR";

/// Monitor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Time between ticks in milliseconds
    pub interval_ms: u64,
    /// Bounded wait for the polling task on stop, in milliseconds
    pub stop_timeout_ms: u64,
    /// Dashboard redraw period in seconds
    pub refresh_secs: u64,
    /// How long `watch` runs, in seconds
    pub duration_secs: u64,
    /// Where `watch` saves the metrics document
    pub output_path: PathBuf,
    /// Seed for synthetic samples
    pub seed: Option<u64>,
    /// JSON diagnostics file of a live system
    pub diagnostics_path: Option<PathBuf>,
    pub thresholds: ThresholdTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            stop_timeout_ms: 2000,
            refresh_secs: 2,
            duration_secs: 30,
            output_path: PathBuf::from("dashboard_metrics.json"),
            seed: None,
            diagnostics_path: None,
            thresholds: ThresholdTable::default(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, a config file and the environment.
    ///
    /// An explicit path must exist; the default path
    /// (`~/.config/lfm-monitor/config.toml`) is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // Defaults go in as a source so partial overrides of nested tables merge
        let defaults = config::Config::try_from(&Settings::default())
            .context("Failed to encode default configuration")?;
        let mut builder = config::Config::builder().add_source(defaults);

        match explicit_path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// Get the default configuration file path
fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("lfm-monitor").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.interval(), Duration::from_secs(1));
        assert_eq!(settings.stop_timeout(), Duration::from_secs(2));
        assert_eq!(settings.output_path, PathBuf::from("dashboard_metrics.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(
            &path,
            r#"
interval_ms = 250
seed = 9

[thresholds.cache_hit_rate]
warning = 0.8
critical = 0.6
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.interval_ms, 250);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.thresholds.cache_hit_rate.warning, 0.8);
        assert_eq!(
            settings.thresholds.operations_rate,
            ThresholdTable::default().operations_rate
        );
        assert_eq!(settings.refresh_secs, 2);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/monitor.toml"))).is_err());
    }

    #[test]
    fn test_partial_threshold_override_keeps_other_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(&path, "[thresholds.operations_rate]\nwarning = 20000.0\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.thresholds.operations_rate.warning, 20_000.0);
        assert_eq!(settings.thresholds.operations_rate.critical, 1_000.0);
    }
}
