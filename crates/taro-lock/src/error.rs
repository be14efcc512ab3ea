//! Lock error types

use taro_store::StoreError;

/// Error type for lock protocol operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// Rejected before any store interaction
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The candidate node could not be created; the attempt is over and the
    /// caller decides whether to retry from scratch
    #[error("failed to create candidate node: {0}")]
    AcquisitionFailed(#[source] StoreError),

    /// A non-blocking attempt found a lower-ranked contender; the candidate
    /// has already been cleaned up when this surfaces
    #[error("lock is held by a lower-ranked contender")]
    Contended,

    /// The blocking wait exceeded the configured timeout; the lock remains
    /// unacquired and the candidate has been cleaned up
    #[error("lock wait timed out")]
    WaitTimeout,

    /// Our own candidate vanished from the contention queue; fatal, never
    /// retried internally
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// `acquire` called on a handle that already holds the lock
    #[error("lock already held by this handle")]
    AlreadyHeld,

    /// Any other store failure during the protocol
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LockError::Contended;
        assert_eq!(err.to_string(), "lock is held by a lower-ranked contender");

        let err = LockError::WaitTimeout;
        assert_eq!(err.to_string(), "lock wait timed out");

        let err = LockError::Configuration("lock_name must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: lock_name must not be empty"
        );
    }

    #[test]
    fn test_from_store_error() {
        let err: LockError = StoreError::ConnectionLoss.into();
        assert!(matches!(err, LockError::Store(StoreError::ConnectionLoss)));
    }
}
