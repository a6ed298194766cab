//! # redblack
//!
//! An ordered associative container backed by a red-black tree.
//!
//! ## Overview
//!
//! [`RedBlackTree`](tree::RedBlackTree) keeps its height within
//! `2 * log2(n + 1)` regardless of insertion order, so insert, search and
//! in-order traversal stay O(log n) even on sorted or adversarial input.
//! It is meant as a building block for higher-level ordered maps and sets.
//!
//! - **Arena storage**: nodes live in a `Vec` owned by the tree and refer to
//!   each other through [`NodeId`](tree::NodeId) indices. Id `0` is the
//!   black sentinel that stands for every missing child and for the root's
//!   parent.
//! - **Stable handles**: the id returned by `insert` keeps naming the same
//!   entry across every later rotation.
//! - **Duplicates**: equal keys are allowed and routed right; `search`
//!   finds the first one inserted.
//!
//! ## Feature Flags
//!
//! - `set` (default): key-only [`RedBlackSet`](tree::RedBlackSet)
//! - `serde`: serialization of trees and sets
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use redblack::prelude::*;
//!
//! let mut tree = RedBlackTree::new();
//! for key in (0..10).rev() {
//!     tree.insert(key, key * 10);
//! }
//!
//! let mut values = Vec::new();
//! tree.walk(|value| values.push(*value));
//! assert_eq!(values, (0..10).map(|key| key * 10).collect::<Vec<_>>());
//! assert_eq!(tree.get(&3), Some(&30));
//! assert!(tree.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use redblack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::InvariantViolation;
    pub use crate::tree::*;
}

pub mod error;
pub mod tree;

pub use error::InvariantViolation;
pub use tree::{Color, NodeId, NodeRef, RedBlackTree, TreeStats};

#[cfg(feature = "set")]
pub use tree::RedBlackSet;
