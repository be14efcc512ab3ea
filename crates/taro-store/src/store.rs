//! The coordination store trait

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CreateMode, ExistsWatch};

/// Client seam to a ZooKeeper-like coordination store
///
/// Implementations must provide strongly consistent, totally ordered node
/// creation, ephemeral nodes tied to the handle's session, and single-fire
/// existence watches. The lock protocol is written entirely against this
/// trait; the handle is an explicit, injected dependency.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Create a node with the given payload.
    ///
    /// Sequential modes append a store-assigned, monotonically increasing
    /// sequence number to `path` and return the resulting path; a
    /// non-sequential create fails with `NodeExists` when the path is taken.
    /// The parent must already exist.
    async fn create(&self, path: &str, data: &[u8], mode: CreateMode) -> Result<String>;

    /// Whether a node currently exists at `path`
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Delete a node. Fails with `NoNode` when absent and `NotEmpty` when it
    /// still has children.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Names (not full paths) of the node's direct children
    async fn list_children(&self, path: &str) -> Result<Vec<String>>;

    /// Register a single-fire watch for the next create/delete/session event
    /// on `path`, reporting whether the node exists at registration time.
    ///
    /// The existence answer and the registration are atomic with respect to
    /// each other: an event for any later change is guaranteed to reach the
    /// returned channel.
    async fn watch_exists(&self, path: &str) -> Result<ExistsWatch>;
}
