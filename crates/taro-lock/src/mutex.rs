//! The public lock handle

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use taro_store::{CoordinationStore, StoreError};

use crate::config::LockConfig;
use crate::contender::{CandidateNode, Standing};
use crate::ensure::ensure_path;
use crate::error::{LockError, Result};
use crate::wait::wait_for_removal;

/// Lifecycle of a lock handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Unacquired,
    Acquiring,
    Held,
    Released,
}

/// Mutual-exclusion handle backed by a contention queue in the coordination
/// store
///
/// One handle represents one contender. Handles are independent: any number
/// may share a store connection, each with its own candidate node, and the
/// suspension inside a blocking acquire never stalls unrelated attempts.
/// The handle is not reentrant.
///
/// Prefer [`with_lock`](Self::with_lock) for scoped use; it releases on both
/// the success and error paths. Explicit [`release`](Self::release) also
/// cancels an in-flight attempt, deleting the candidate node it created.
pub struct DistributedMutex {
    store: Arc<dyn CoordinationStore>,
    config: LockConfig,
    state: LockState,
    candidate: Option<CandidateNode>,
}

impl DistributedMutex {
    /// Build a handle, rejecting invalid configuration before any store
    /// interaction
    pub fn new(store: Arc<dyn CoordinationStore>, config: LockConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            state: LockState::Unacquired,
            candidate: None,
        })
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        self.state == LockState::Held
    }

    /// Full path of this attempt's candidate node, if one exists
    pub fn candidate_path(&self) -> Option<&str> {
        self.candidate.as_ref().map(|candidate| candidate.path.as_str())
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Claim the lock, suspending (event-driven, never polling) until it is
    /// ours, the configured timeout passes, or the attempt fails.
    ///
    /// On any non-success outcome the candidate node is removed and the
    /// handle is back in `Unacquired`; there are no partial states.
    pub async fn acquire(&mut self) -> Result<()> {
        if self.state == LockState::Held {
            return Err(LockError::AlreadyHeld);
        }
        self.state = LockState::Acquiring;
        let deadline = Instant::now() + self.config.wait_timeout();

        if self.config.create_namespace
            && let Err(e) = ensure_path(self.store.as_ref(), &self.config.namespace_root).await
        {
            self.state = LockState::Unacquired;
            return Err(e.into());
        }

        match self.contend(deadline).await {
            Ok(()) => {
                self.state = LockState::Held;
                tracing::debug!(path = ?self.candidate_path(), "lock acquired");
                Ok(())
            }
            Err(e) => {
                self.abandon_candidate().await;
                self.state = LockState::Unacquired;
                Err(e)
            }
        }
    }

    async fn contend(&mut self, deadline: Instant) -> Result<()> {
        let candidate = CandidateNode::enter(self.store.as_ref(), &self.config).await?;
        // Recorded before the first suspension so a cancelled attempt still
        // has its candidate cleaned up by `release` or drop.
        self.candidate = Some(candidate.clone());

        loop {
            match candidate.evaluate(self.store.as_ref(), &self.config).await? {
                Standing::Owner => return Ok(()),
                Standing::Behind { predecessor } => {
                    if self.config.non_blocking {
                        return Err(LockError::Contended);
                    }
                    tracing::debug!(
                        candidate = %candidate.path,
                        predecessor = %predecessor,
                        "queued behind predecessor"
                    );
                    // The predecessor going away does not make us the owner:
                    // the queue may have changed while we slept. Both a
                    // removal and a spurious wake land back at re-evaluation;
                    // only the timeout exits the loop.
                    wait_for_removal(self.store.as_ref(), &predecessor, deadline).await?;
                }
            }
        }
    }

    /// Best-effort candidate removal on a non-success path. `NoNode` means
    /// the session (or an operator) got there first.
    async fn abandon_candidate(&mut self) {
        if let Some(candidate) = self.candidate.take() {
            match self.store.delete(&candidate.path).await {
                Ok(()) | Err(StoreError::NoNode(_)) => {}
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.path,
                        error = %e,
                        "failed to remove candidate node; session cleanup will reclaim it"
                    );
                }
            }
        }
    }

    /// Give the lock up, or cancel an in-flight attempt.
    ///
    /// Idempotent: releasing a handle that holds nothing is a no-op, never
    /// an error. `NoNode` on the delete is swallowed too; the session may
    /// already have dropped the candidate. Any other store failure surfaces
    /// and leaves the handle unchanged so the call can be retried.
    pub async fn release(&mut self) -> Result<()> {
        let Some(candidate) = self.candidate.take() else {
            return Ok(());
        };
        match self.store.delete(&candidate.path).await {
            Ok(()) | Err(StoreError::NoNode(_)) => {
                self.state = LockState::Released;
                tracing::debug!(path = %candidate.path, "lock released");
                Ok(())
            }
            Err(e) => {
                self.candidate = Some(candidate);
                Err(e.into())
            }
        }
    }

    /// Run `f` while holding the lock, releasing on the way out of the scope
    /// on both the success and error paths
    pub async fn with_lock<T, F, Fut>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.acquire().await?;
        let output = f().await;
        self.release().await?;
        Ok(output)
    }
}

impl Drop for DistributedMutex {
    fn drop(&mut self) {
        let Some(candidate) = self.candidate.take() else {
            return;
        };
        // Backstop for handles dropped without release; the store's session
        // timeout reclaims the node when no runtime is available here.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = Arc::clone(&self.store);
                handle.spawn(async move {
                    let _ = store.delete(&candidate.path).await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    path = %candidate.path,
                    "lock handle dropped with a live candidate and no runtime; leaving cleanup to the session"
                );
            }
        }
    }
}
