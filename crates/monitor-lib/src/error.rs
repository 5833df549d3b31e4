//! Error types for the monitor

use thiserror::Error;

/// Errors raised while sampling, recording or persisting metrics
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A configured diagnostics provider did not report a required field
    #[error("diagnostics field missing: {0}")]
    MissingField(String),

    /// A diagnostics or saved-document field was present but could not be used
    #[error("field {path} is invalid: {reason}")]
    InvalidField { path: String, reason: String },

    /// The diagnostics provider itself failed
    #[error("diagnostics provider failed: {0}")]
    Provider(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
