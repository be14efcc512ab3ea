//! Taro Store - coordination store seam for the Taro lock protocol
//!
//! This crate provides:
//! - `CoordinationStore`: the async trait the lock protocol is written against
//! - Create modes, watch events, and the store error taxonomy
//! - `MemoryStore`: an in-process simulation of the store with sessions,
//!   ephemeral nodes, per-parent sequence counters, and single-fire watches

pub mod error;
pub mod memory;
pub mod model;
pub mod store;

// Re-exports for convenience
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use model::{CreateMode, ExistsWatch, WatchEvent};
pub use store::CoordinationStore;
