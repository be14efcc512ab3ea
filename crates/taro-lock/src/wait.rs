//! Event-driven wait for a predecessor to leave the queue

use tokio::time::Instant;

use taro_store::{CoordinationStore, WatchEvent};

use crate::error::{LockError, Result};

/// Why a wait returned without timing out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The watched node is gone; the queue has moved
    Removed,
    /// The watch fired for a session/connection event, or the store dropped
    /// the registration; the caller must re-evaluate from a fresh listing
    Interrupted,
}

/// Suspend until `path` is removed or `deadline` passes.
///
/// Exactly one watch is registered per call and it is consumed before the
/// call returns, so a registration can never be left behind to fire into a
/// later wait. The suspension is purely event-driven; there is deliberately
/// no existence re-poll loop here.
pub async fn wait_for_removal(
    store: &dyn CoordinationStore,
    path: &str,
    deadline: Instant,
) -> Result<WaitOutcome> {
    let watch = store.watch_exists(path).await?;
    if !watch.exists {
        return Ok(WaitOutcome::Removed);
    }

    match tokio::time::timeout_at(deadline, watch.events).await {
        Ok(Ok(WatchEvent::Deleted)) => Ok(WaitOutcome::Removed),
        Ok(Ok(event)) => {
            tracing::debug!(path = %path, ?event, "watch fired without a removal");
            Ok(WaitOutcome::Interrupted)
        }
        // Channel closed without an event: treat like a connection blip and
        // let the evaluation loop re-read the truth.
        Ok(Err(_)) => Ok(WaitOutcome::Interrupted),
        Err(_) => Err(LockError::WaitTimeout),
    }
}
