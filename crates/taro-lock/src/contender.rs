//! Contention-queue entry and ownership evaluation

use taro_common::paths;
use taro_store::{CoordinationStore, CreateMode};

use crate::config::LockConfig;
use crate::error::{LockError, Result};

/// The ephemeral, sequential node one lock attempt owns in the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateNode {
    /// Full path of the node the store created
    pub path: String,
    /// Store-assigned rank among siblings
    pub sequence: u64,
}

/// Where a candidate stands after one evaluation of the sibling set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Standing {
    /// No smaller sequence exists; the lock is ours
    Owner,
    /// Queued behind the sibling with the largest smaller sequence
    Behind { predecessor: String },
}

impl CandidateNode {
    /// Join the contention queue for `config`'s lock.
    ///
    /// The store appends the sequence suffix; a failed create is fatal to the
    /// attempt and is not retried here.
    pub async fn enter(store: &dyn CoordinationStore, config: &LockConfig) -> Result<Self> {
        let prefix = config.candidate_prefix();
        let path = store
            .create(&prefix, &[], CreateMode::EphemeralSequential)
            .await
            .map_err(LockError::AcquisitionFailed)?;
        let name = path.rsplit('/').next().unwrap_or_default();
        let sequence = paths::sequence_suffix(name, &config.lock_name).ok_or_else(|| {
            LockError::InvariantViolation(format!(
                "store returned unparseable candidate path '{path}'"
            ))
        })?;
        tracing::debug!(path = %path, sequence, "joined contention queue");
        Ok(Self { path, sequence })
    }

    /// Rank the sibling set and decide ownership.
    ///
    /// The listing is read fresh on every call; the store is the source of
    /// truth. Siblings belonging to other lock names under the same root are
    /// ignored, and sequences are compared numerically so correctness never
    /// depends on the store's padding width.
    pub async fn evaluate(
        &self,
        store: &dyn CoordinationStore,
        config: &LockConfig,
    ) -> Result<Standing> {
        let children = store.list_children(&config.namespace_root).await?;
        let mut queue: Vec<(u64, String)> = children
            .into_iter()
            .filter_map(|name| {
                paths::sequence_suffix(&name, &config.lock_name).map(|sequence| (sequence, name))
            })
            .collect();
        queue.sort_unstable_by_key(|(sequence, _)| *sequence);

        if !queue.iter().any(|(sequence, _)| *sequence == self.sequence) {
            // Our create succeeded but the listing no longer shows it: the
            // candidate was deleted externally or the store lost consistency.
            return Err(LockError::InvariantViolation(format!(
                "candidate '{}' is missing from the contention queue",
                self.path
            )));
        }

        let predecessor = queue
            .iter()
            .rev()
            .find(|(sequence, _)| *sequence < self.sequence)
            .map(|(_, name)| paths::join(&config.namespace_root, name));

        match predecessor {
            None => Ok(Standing::Owner),
            Some(predecessor) => Ok(Standing::Behind { predecessor }),
        }
    }
}
