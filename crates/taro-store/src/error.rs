//! Store error types

/// Error type for coordination store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("node already exists: {0}")]
    NodeExists(String),

    #[error("node does not exist: {0}")]
    NoNode(String),

    #[error("node has children: {0}")]
    NotEmpty(String),

    #[error("malformed path: {0}")]
    BadPath(String),

    #[error("connection to the coordination store lost")]
    ConnectionLoss,

    #[error("session expired")]
    SessionExpired,
}

pub type Result<T> = std::result::Result<T, StoreError>;
