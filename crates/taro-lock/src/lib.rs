//! Taro Lock - queue-ordered distributed mutual exclusion
//!
//! This crate implements the contention-queue lock recipe over a
//! ZooKeeper-like coordination store:
//! - Each contender claims an ephemeral, sequential candidate node
//! - The minimum sequence number owns the lock
//! - Everyone else suspends on the removal of their immediate predecessor,
//!   event-driven through a single-fire existence watch
//!
//! Ownership transfers strictly in sequence order. A crashed holder's
//! candidate disappears with its session and the queue moves on without it;
//! the protocol never polls.

pub mod config;
pub mod contender;
pub mod ensure;
pub mod error;
pub mod mutex;
pub mod wait;

// Re-exports for convenience
pub use config::LockConfig;
pub use error::{LockError, Result};
pub use mutex::{DistributedMutex, LockState};
