//! # Error Types for the Ordered Tree
//!
//! This module defines the error type returned by fallible tree operations.
//!
//! ## Error Handling Strategy
//!
//! Almost every operation on the tree is total. A lookup that misses, a delete
//! of an absent key, or a `first()` on an empty tree are ordinary outcomes and
//! are reported as `None`, never as an error.
//!
//! The only operation that can fail is insertion of a key that is already
//! present. Duplicate detection happens while descending, before any link is
//! written, so a failed insert leaves the tree exactly as it was:
//!
//! ```text
//! insert(key)
//!      │
//!      ▼
//! Descend from root ──── key found ───► Err(DuplicateKey) (no writes)
//!      │
//!      ▼ (empty slot reached)
//! Create node via factory
//!      │
//!      ▼
//! Attach leaf, rebalance path
//!      │
//!      ▼
//! Ok(NodeId)
//! ```

use thiserror::Error;

/// Errors that can occur during tree operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// The key is already stored in the tree.
	///
	/// Keys are unique. The tree is left unchanged and the node factory is
	/// not invoked.
	#[error("tree already contains a node with key {0}")]
	DuplicateKey(i64),
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
