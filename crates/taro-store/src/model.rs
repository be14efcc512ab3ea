//! Create modes, watch events, and watch handles

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// How a node is created and how long it lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMode {
    /// Survives the creating session
    #[default]
    Persistent,
    /// Survives the session, with a store-assigned sequence suffix
    PersistentSequential,
    /// Removed by the store when the creating session ends
    Ephemeral,
    /// Ephemeral, with a store-assigned sequence suffix
    EphemeralSequential,
}

impl CreateMode {
    pub fn is_ephemeral(self) -> bool {
        matches!(self, CreateMode::Ephemeral | CreateMode::EphemeralSequential)
    }

    pub fn is_sequential(self) -> bool {
        matches!(
            self,
            CreateMode::PersistentSequential | CreateMode::EphemeralSequential
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreateMode::Persistent => "persistent",
            CreateMode::PersistentSequential => "persistent_sequential",
            CreateMode::Ephemeral => "ephemeral",
            CreateMode::EphemeralSequential => "ephemeral_sequential",
        }
    }
}

impl std::fmt::Display for CreateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single-fire notification about a watched node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchEvent {
    /// The node was created
    Created,
    /// The node was deleted
    Deleted,
    /// The client's view of the store changed (disconnect, session event);
    /// the node itself may be untouched
    ConnectionStateChanged,
}

/// Result of registering an existence watch: the state at registration time
/// plus the channel the single-fire event arrives on
#[derive(Debug)]
pub struct ExistsWatch {
    pub exists: bool,
    pub events: oneshot::Receiver<WatchEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mode_flags() {
        assert!(!CreateMode::Persistent.is_ephemeral());
        assert!(!CreateMode::Persistent.is_sequential());
        assert!(CreateMode::EphemeralSequential.is_ephemeral());
        assert!(CreateMode::EphemeralSequential.is_sequential());
        assert!(CreateMode::PersistentSequential.is_sequential());
        assert!(CreateMode::Ephemeral.is_ephemeral());
    }

    #[test]
    fn test_create_mode_display() {
        assert_eq!(CreateMode::default(), CreateMode::Persistent);
        assert_eq!(
            CreateMode::EphemeralSequential.to_string(),
            "ephemeral_sequential"
        );
    }
}
