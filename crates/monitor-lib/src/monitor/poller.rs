//! Background polling task
//!
//! Runs one tick per interval until cancelled. Cancellation is only observed
//! between ticks, so an in-flight tick always completes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Shared;

/// Handle to a running polling task
pub(crate) struct PollerHandle {
    pub(crate) cancel: CancellationToken,
    pub(crate) task: JoinHandle<()>,
}

impl PollerHandle {
    /// False once the task has exited, including by panic
    pub(crate) fn is_alive(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Spawn the polling task on the current runtime
pub(crate) fn spawn(shared: Arc<Shared>, period: Duration) -> PollerHandle {
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run(shared, period, cancel.clone()));
    PollerHandle { cancel, task }
}

async fn run(shared: Arc<Shared>, period: Duration, cancel: CancellationToken) {
    info!(interval_ms = period.as_millis(), "Starting polling loop");

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick_count = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(ticks = tick_count, "Polling loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                shared.run_tick().await;
                tick_count += 1;
            }
        }
    }
}
