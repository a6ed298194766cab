//! Structural checks for [`RedBlackTree`].

use tracing::debug;

use super::{Color, Links, NodeId, RedBlackTree};
use crate::error::InvariantViolation;

/// Shape of a tree that passed [`RedBlackTree::validate`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeStats {
    /// Number of entries.
    pub len: usize,
    /// Nodes on the longest root-to-leaf path.
    pub height: usize,
    /// Black nodes on every root-to-sentinel path, root included.
    pub black_height: usize,
}

/// State threaded through the in-order check.
struct Progress {
    reachable: usize,
    /// Last visited node and its arena slot.
    previous: Option<(NodeId, usize)>,
}

impl<K: Ord, V> RedBlackTree<K, V> {
    /// Checks every red-black invariant and returns the tree's shape.
    ///
    /// This is an O(N) diagnostic; `insert` never calls it. Violations are
    /// only possible when `K`'s `Ord` is not a total order.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32, ()> = (0..1000).map(|key| (key, ())).collect();
    /// let stats = tree.validate().unwrap();
    /// assert_eq!(stats.len, 1000);
    /// assert!(stats.height <= 2 * stats.black_height);
    /// ```
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        let result = self.check_tree();
        if let Err(violation) = &result {
            debug!(%violation, len = self.len(), "red-black invariant violated");
        }
        result
    }

    fn check_tree(&self) -> Result<TreeStats, InvariantViolation> {
        if *self.sentinel_links() != Links::SENTINEL {
            return Err(InvariantViolation::CorruptSentinel);
        }

        let root = self.root();
        if !root.is_sentinel() {
            let links = self.links(root);
            if links.color == Color::Red {
                return Err(InvariantViolation::RedRoot { root });
            }
            if !links.parent.is_sentinel() {
                return Err(InvariantViolation::BrokenParentLink {
                    node: root,
                    expected: None,
                    found: Some(links.parent),
                });
            }
        }

        let mut progress = Progress {
            reachable: 0,
            previous: None,
        };
        let (black_height, height) = self.check_subtree(root, &mut progress)?;
        if progress.reachable != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len(),
                found: progress.reachable,
            });
        }

        Ok(TreeStats {
            len: self.len(),
            height,
            black_height,
        })
    }

    /// Returns `(black_height, height)` of the subtree rooted at `node`.
    fn check_subtree(
        &self,
        node: NodeId,
        progress: &mut Progress,
    ) -> Result<(usize, usize), InvariantViolation> {
        let Some(slot) = node.slot() else {
            return Ok((0, 0));
        };
        let links = *self.links(node);

        for child in [links.left, links.right] {
            if child.is_sentinel() {
                continue;
            }
            let child_links = self.links(child);
            if child_links.parent != node {
                return Err(InvariantViolation::BrokenParentLink {
                    node: child,
                    expected: Some(node),
                    found: Some(child_links.parent).filter(|parent| !parent.is_sentinel()),
                });
            }
            if links.color == Color::Red && child_links.color == Color::Red {
                return Err(InvariantViolation::ConsecutiveReds {
                    parent: node,
                    child,
                });
            }
        }

        let (left_blacks, left_height) = self.check_subtree(links.left, progress)?;

        progress.reachable += 1;
        if progress.reachable > self.len() {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len(),
                found: progress.reachable,
            });
        }
        if let Some((previous, previous_slot)) = progress.previous {
            if self.entry(slot).key < self.entry(previous_slot).key {
                return Err(InvariantViolation::OutOfOrder {
                    previous,
                    next: node,
                });
            }
        }
        progress.previous = Some((node, slot));

        let (right_blacks, right_height) = self.check_subtree(links.right, progress)?;

        if left_blacks != right_blacks {
            return Err(InvariantViolation::UnbalancedBlacks {
                node,
                left: left_blacks,
                right: right_blacks,
            });
        }

        let own = usize::from(links.color == Color::Black);
        Ok((left_blacks + own, 1 + usize::max(left_height, right_height)))
    }
}
