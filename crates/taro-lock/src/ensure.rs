//! Idempotent materialization of a namespace chain

use taro_common::paths;
use taro_store::{CoordinationStore, CreateMode, StoreError};

/// Make sure every node on `path` exists, parent before child.
///
/// Safe to run concurrently from many contenders: losing a creation race is
/// indistinguishable from the node having existed all along. Created nodes
/// are persistent and stay behind; the namespace is shared infrastructure,
/// not per-lock state.
pub async fn ensure_path(
    store: &dyn CoordinationStore,
    path: &str,
) -> Result<(), StoreError> {
    for prefix in paths::ancestors(path) {
        if store.exists(&prefix).await? {
            continue;
        }
        match store.create(&prefix, &[], CreateMode::Persistent).await {
            Ok(_) => tracing::debug!(path = %prefix, "created namespace node"),
            Err(StoreError::NodeExists(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
