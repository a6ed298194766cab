//! Red-black tree engine and the containers built on it.
//!
//! - [`RedBlackTree`]: ordered multimap with stable [`NodeId`] handles
//! - [`RedBlackSet`]: key-only variant (feature `set`)
//!
//! # Storage
//!
//! Nodes are stored in an arena owned by the tree and link to each other by
//! index. Parent links are plain indices used for O(1) ascent during
//! rotation and fix-up, so no ownership cycle exists. Index `0` is the
//! sentinel: a single black placeholder standing for every empty subtree and
//! for the root's parent.
//!
//! # Examples
//!
//! ```rust
//! use redblack::tree::RedBlackTree;
//!
//! let mut tree = RedBlackTree::new();
//! for key in (0..20).step_by(2) {
//!     tree.insert(key, false);
//! }
//! tree.insert(3, true);
//!
//! assert_eq!(tree.get(&3), Some(&true));
//! assert_eq!(tree.get(&4), Some(&false));
//! assert_eq!(tree.get(&5), None);
//! assert_eq!(tree.len(), 11);
//! ```
//!
//! ## Duplicate keys
//!
//! ```rust
//! use redblack::tree::RedBlackTree;
//!
//! let mut tree = RedBlackTree::new();
//! let first = tree.insert(7, "first");
//! tree.insert(7, "second");
//! tree.insert(7, "third");
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.search(&7), Some(first));
//! assert_eq!(tree.values().copied().collect::<Vec<_>>(), ["first", "second", "third"]);
//! ```

mod iter;
mod node;
mod red_black;
#[cfg(feature = "set")]
mod set;
mod validate;

pub use iter::{RedBlackTreeIntoIterator, RedBlackTreeIterator};
pub use node::{Color, NodeId, NodeRef};
pub use red_black::RedBlackTree;
#[cfg(feature = "set")]
pub use set::{RedBlackSet, RedBlackSetIterator};
pub use validate::TreeStats;

pub(crate) use node::{Direction, Links, Node};
