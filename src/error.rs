//! Error types for the red-black tree.
//!
//! Inserting and searching never fail. The only error in this crate is
//! [`InvariantViolation`], reported by
//! [`RedBlackTree::validate`](crate::tree::RedBlackTree::validate) when a
//! structural check does not hold.

use crate::tree::NodeId;

/// Describes the first red-black invariant found broken by `validate`.
///
/// A correctly used tree never produces one. Seeing any variant means the key
/// type's `Ord` implementation is not a total order, or the tree itself has a
/// bug.
///
/// # Examples
///
/// ```rust
/// use redblack::prelude::*;
///
/// let tree: RedBlackTree<i32, ()> = (0..64).map(|key| (key, ())).collect();
/// let stats = tree.validate().expect("tree must be balanced");
/// assert_eq!(stats.len, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The sentinel stopped being black or one of its links was rewritten.
    CorruptSentinel,
    /// The root node is red.
    RedRoot {
        /// The root node.
        root: NodeId,
    },
    /// A child does not point back at the parent that links to it.
    BrokenParentLink {
        /// The child whose parent link is wrong.
        node: NodeId,
        /// The parent that links to `node`, `None` for the root.
        expected: Option<NodeId>,
        /// The parent recorded on `node`, `None` for the sentinel.
        found: Option<NodeId>,
    },
    /// A red node has a red child.
    ConsecutiveReds {
        /// The red parent.
        parent: NodeId,
        /// Its red child.
        child: NodeId,
    },
    /// The two subtrees of a node have different black-heights.
    UnbalancedBlacks {
        /// The node whose subtrees disagree.
        node: NodeId,
        /// Black-height of the left subtree.
        left: usize,
        /// Black-height of the right subtree.
        right: usize,
    },
    /// Two neighbours in key order are not sorted.
    OutOfOrder {
        /// The node visited first.
        previous: NodeId,
        /// The node visited right after it, with a smaller key.
        next: NodeId,
    },
    /// The number of reachable nodes differs from the tree's length.
    LengthMismatch {
        /// Length recorded by the tree.
        expected: usize,
        /// Nodes reachable from the root.
        found: usize,
    },
}

fn describe(node: Option<NodeId>) -> String {
    node.map_or_else(|| "sentinel".to_string(), |id| format!("{id}"))
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptSentinel => write!(formatter, "sentinel must be black and self-linked"),
            Self::RedRoot { root } => write!(formatter, "root node {root} must be black"),
            Self::BrokenParentLink {
                node,
                expected,
                found,
            } => write!(
                formatter,
                "node {node} has parent {} but is linked from {}",
                describe(*found),
                describe(*expected)
            ),
            Self::ConsecutiveReds { parent, child } => {
                write!(formatter, "red node {parent} has red child {child}")
            }
            Self::UnbalancedBlacks { node, left, right } => write!(
                formatter,
                "node {node} has black-height {left} on the left and {right} on the right"
            ),
            Self::OutOfOrder { previous, next } => {
                write!(formatter, "node {next} sorts before its predecessor {previous}")
            }
            Self::LengthMismatch { expected, found } => write!(
                formatter,
                "tree records {expected} nodes but {found} are reachable"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
