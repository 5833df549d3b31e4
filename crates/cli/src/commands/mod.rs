//! CLI command implementations

pub mod inspect;
pub mod thresholds;
pub mod watch;
