//! Node representation: colors, handles, links and the read-only node view.

use std::fmt;

use static_assertions::assert_impl_all;

use super::RedBlackTree;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// A red node. Never the root, never the parent of another red node.
    Red,
    /// A black node. The sentinel is always black.
    Black,
}

// =============================================================================
// Node Handles
// =============================================================================

/// Stable handle to a node of a [`RedBlackTree`].
///
/// Handles are arena indices. Rotations relink nodes but never move them, so
/// a handle returned by [`RedBlackTree::insert`] names the same entry for the
/// whole life of the tree. The value `0` is reserved for the sentinel and is
/// never handed out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(usize);

assert_impl_all!(NodeId: Copy, Send, Sync);

impl NodeId {
    /// The shared "no node" placeholder.
    pub(crate) const SENTINEL: Self = Self(0);

    #[inline]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        Self(slot + 1)
    }

    /// Arena slot of a real node, `None` for the sentinel.
    #[inline]
    pub(crate) const fn slot(self) -> Option<usize> {
        self.0.checked_sub(1)
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.0 == 0
    }

    /// Zero-based position of this node in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let first = tree.insert("b", 1);
    /// let second = tree.insert("a", 2);
    /// assert_eq!(first.insertion_index(), 0);
    /// assert_eq!(second.insertion_index(), 1);
    /// ```
    #[inline]
    pub const fn insertion_index(self) -> usize {
        self.0.saturating_sub(1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

// =============================================================================
// Links and Nodes
// =============================================================================

/// Side of a parent a child hangs from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Structural part of a node. The sentinel is a bare `Links` value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Links {
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) color: Color,
}

impl Links {
    /// Black, with every link pointing back at itself.
    pub(crate) const SENTINEL: Self = Self {
        parent: NodeId::SENTINEL,
        left: NodeId::SENTINEL,
        right: NodeId::SENTINEL,
        color: Color::Black,
    };

    #[inline]
    pub(crate) const fn child(&self, direction: Direction) -> NodeId {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, direction: Direction, child: NodeId) {
        match direction {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }
}

/// An entry stored in the arena.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) links: Links,
}

impl<K, V> Node<K, V> {
    /// Creates a red leaf hanging from `parent`.
    pub(crate) const fn new_red(key: K, value: V, parent: NodeId) -> Self {
        Self {
            key,
            value,
            links: Links {
                parent,
                left: NodeId::SENTINEL,
                right: NodeId::SENTINEL,
                color: Color::Red,
            },
        }
    }
}

// =============================================================================
// Node View
// =============================================================================

/// Read-only view of one node, borrowed from its tree.
///
/// Navigation methods return `None` where the tree has its sentinel.
///
/// # Examples
///
/// ```rust
/// use redblack::tree::{Color, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(1, "one");
/// tree.insert(2, "two");
/// tree.insert(3, "three");
///
/// // Ascending inserts rotate 2 up to the root.
/// let root = tree.root_node().unwrap();
/// assert_eq!(root.key(), &2);
/// assert_eq!(root.color(), Color::Black);
/// assert_eq!(root.left().map(|node| *node.value()), Some("one"));
/// assert_eq!(root.right().map(|node| node.color()), Some(Color::Red));
/// assert!(root.parent().is_none());
/// ```
pub struct NodeRef<'a, K, V> {
    tree: &'a RedBlackTree<K, V>,
    id: NodeId,
    node: &'a Node<K, V>,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) const fn new(tree: &'a RedBlackTree<K, V>, id: NodeId, node: &'a Node<K, V>) -> Self {
        Self { tree, id, node }
    }

    /// Handle of this node.
    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Key stored in this node.
    #[inline]
    pub const fn key(&self) -> &'a K {
        &self.node.key
    }

    /// Value stored in this node.
    #[inline]
    pub const fn value(&self) -> &'a V {
        &self.node.value
    }

    /// Current color of this node.
    #[inline]
    pub const fn color(&self) -> Color {
        self.node.links.color
    }

    /// Returns `true` if this node is red.
    #[inline]
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    /// Parent of this node, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.tree.node(self.node.links.parent)
    }

    /// Left child of this node.
    pub fn left(&self) -> Option<Self> {
        self.tree.node(self.node.links.left)
    }

    /// Right child of this node.
    pub fn right(&self) -> Option<Self> {
        self.tree.node(self.node.links.right)
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", &self.node.key)
            .field("value", &self.node.value)
            .field("color", &self.node.links.color)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
