//! Taro Common - shared foundations for the Taro lock crates
//!
//! This crate provides:
//! - Path algebra for the coordination store's hierarchical namespace
//! - Sequence-suffix parsing for contention-queue sibling names
//! - Shared constants

pub mod paths;

// Re-exports for convenience
pub use paths::{PathError, ancestors, join, parent, sequence_suffix, validate_path};

/// Separator between a lock name and its store-assigned sequence suffix
pub const SEQUENCE_SEPARATOR: char = '-';

/// Width the store pads sequence numbers to
pub const SEQUENCE_WIDTH: usize = 10;
