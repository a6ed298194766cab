//! Arena-backed red-black tree.
//!
//! This module provides [`RedBlackTree`], a mutable ordered multimap that
//! keeps itself balanced on every insertion.
//!
//! # Overview
//!
//! - O(log N) insert
//! - O(log N) search / get
//! - O(N) in-order walk
//! - O(1) len and `is_empty`
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants after every insertion:
//! 1. Every node is either red or black, the sentinel is black
//! 2. The root is black
//! 3. Red nodes have only black children
//! 4. Every path from a node to a descendant sentinel has the same number of
//!    black nodes
//! 5. Left subtree keys are `<=` the node key, right subtree keys are `>=`
//!
//! These invariants bound the height by `2 * log2(N + 1)`.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use static_assertions::assert_impl_all;
use tracing::trace;

use super::iter::{RedBlackTreeIntoIterator, RedBlackTreeIterator};
use super::{Color, Direction, Links, Node, NodeId, NodeRef};

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// An ordered multimap based on a red-black tree.
///
/// Keys must implement `Ord`. Equal keys are all kept: a new entry whose key
/// equals an existing one is placed after it in key order, and
/// [`search`](Self::search) returns the earliest inserted of them.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `insert`       | O(log N)          |
/// | `search`/`get` | O(log N)          |
/// | `min`/`max`    | O(log N)          |
/// | `walk`/`iter`  | O(N)              |
/// | `height`       | O(N)              |
/// | `len`          | O(1)              |
///
/// # Examples
///
/// ```rust
/// use redblack::tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// for key in 0..100 {
///     tree.insert(key, key.to_string());
/// }
///
/// assert_eq!(tree.len(), 100);
/// assert_eq!(tree.get(&42).map(String::as_str), Some("42"));
/// assert!(tree.height() <= 13);
/// ```
#[derive(Clone)]
pub struct RedBlackTree<K, V> {
    /// Arena of real nodes; `NodeId::from_slot(i)` names `nodes[i]`.
    nodes: Vec<Node<K, V>>,
    /// Root node, the sentinel id when empty.
    root: NodeId,
    /// Links of the sentinel, never written after construction.
    sentinel: Links,
}

assert_impl_all!(RedBlackTree<i32, String>: Send, Sync, Clone);

impl<K, V> RedBlackTree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32, String> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId::SENTINEL,
            sentinel: Links::SENTINEL,
        }
    }

    /// Creates an empty tree with room for `capacity` entries before the
    /// arena reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: NodeId::SENTINEL,
            sentinel: Links::SENTINEL,
        }
    }

    /// Returns the number of entries, counting every duplicate.
    #[inline]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// The root counts as 1 and an empty tree has height 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.height(), 0);
    /// tree.insert(1, ());
    /// assert_eq!(tree.height(), 1);
    /// tree.insert(2, ());
    /// tree.insert(3, ());
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> usize {
        self.height_from(self.root)
    }

    fn height_from(&self, node: NodeId) -> usize {
        if node.is_sentinel() {
            return 0;
        }
        let links = self.links(node);
        1 + usize::max(self.height_from(links.left), self.height_from(links.right))
    }

    /// Returns a view of the node behind `id`.
    ///
    /// `None` is returned for ids that do not belong to this tree.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K, V>> {
        let node = self.nodes.get(id.slot()?)?;
        Some(NodeRef::new(self, id, node))
    }

    /// Returns a view of the root node, `None` when the tree is empty.
    pub fn root_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.node(self.root)
    }

    /// Returns a mutable reference to the value behind `id`.
    ///
    /// Only the payload is reachable; keys and links stay under the tree's
    /// control.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        let slot = id.slot()?;
        self.nodes.get_mut(slot).map(|node| &mut node.value)
    }

    /// Visits every value in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for key in (0..10).rev() {
    ///     tree.insert(key, key);
    /// }
    ///
    /// let mut visited = Vec::new();
    /// tree.walk(|value| visited.push(*value));
    /// assert_eq!(visited, (0..10).collect::<Vec<_>>());
    /// ```
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&V),
    {
        let mut visit = |_: &K, value: &V| visitor(value);
        self.walk_from(self.root, &mut visit);
    }

    /// Visits every entry in ascending key order.
    pub fn walk_entries<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        self.walk_from(self.root, &mut visitor);
    }

    fn walk_from<F>(&self, node: NodeId, visitor: &mut F)
    where
        F: FnMut(&K, &V),
    {
        if let Some(slot) = node.slot() {
            let entry = &self.nodes[slot];
            self.walk_from(entry.links.left, visitor);
            visitor(&entry.key, &entry.value);
            self.walk_from(entry.links.right, visitor);
        }
    }

    /// Returns the entry with the smallest key.
    ///
    /// Among equal smallest keys this is the first one inserted.
    pub fn min(&self) -> Option<(&K, &V)> {
        self.extreme(Direction::Left)
    }

    /// Returns the entry with the largest key.
    ///
    /// Among equal largest keys this is the last one inserted.
    pub fn max(&self) -> Option<(&K, &V)> {
        self.extreme(Direction::Right)
    }

    fn extreme(&self, direction: Direction) -> Option<(&K, &V)> {
        let mut current = self.root;
        loop {
            let node = &self.nodes[current.slot()?];
            let next = node.links.child(direction);
            if next.is_sentinel() {
                return Some((&node.key, &node.value));
            }
            current = next;
        }
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<_, _> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    /// let entries: Vec<(&i32, &&str)> = tree.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    pub fn iter(&self) -> RedBlackTreeIterator<'_, K, V> {
        RedBlackTreeIterator::new(self)
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    // =========================================================================
    // Arena Access
    // =========================================================================

    #[inline]
    pub(crate) const fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub(crate) const fn sentinel_links(&self) -> &Links {
        &self.sentinel
    }

    /// Returns the node stored at `slot` of the arena.
    #[inline]
    pub(crate) fn entry(&self, slot: usize) -> &Node<K, V> {
        &self.nodes[slot]
    }

    pub(crate) fn into_nodes(self) -> Vec<Node<K, V>> {
        self.nodes
    }

    /// Links of `id`, the sentinel's links for the sentinel id.
    #[inline]
    pub(crate) fn links(&self, id: NodeId) -> &Links {
        id.slot()
            .map_or(&self.sentinel, |slot| &self.nodes[slot].links)
    }

    #[inline]
    pub(crate) fn links_mut(&mut self, id: NodeId) -> &mut Links {
        debug_assert!(!id.is_sentinel(), "the sentinel is never relinked");
        match id.slot() {
            Some(slot) => &mut self.nodes[slot].links,
            None => &mut self.sentinel,
        }
    }

    #[cfg(test)]
    pub(crate) const fn sentinel_links_mut(&mut self) -> &mut Links {
        &mut self.sentinel
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        self.links(id).parent
    }

    #[inline]
    fn child(&self, id: NodeId, direction: Direction) -> NodeId {
        self.links(id).child(direction)
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        self.links(id).color
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.links_mut(id).color = color;
    }

    /// Which side of its parent `id` hangs from. Only meaningful for non-root
    /// nodes.
    #[inline]
    fn side_of(&self, id: NodeId) -> Direction {
        if self.child(self.parent(id), Direction::Left) == id {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Rotates the subtree rooted at `pivot` towards `direction`.
    ///
    /// `Direction::Left` promotes the right child of `pivot` (left rotation),
    /// `Direction::Right` promotes its left child. In-order key order is
    /// preserved. The promoted child must not be the sentinel.
    fn rotate(&mut self, pivot: NodeId, direction: Direction) {
        let lifted = self.child(pivot, direction.opposite());
        debug_assert!(!lifted.is_sentinel(), "rotation needs a child to promote");

        // The lifted node's inner subtree moves across to the pivot.
        let inner = self.child(lifted, direction);
        self.links_mut(pivot).set_child(direction.opposite(), inner);
        if !inner.is_sentinel() {
            self.links_mut(inner).parent = pivot;
        }

        let parent = self.parent(pivot);
        self.links_mut(lifted).parent = parent;
        if parent.is_sentinel() {
            self.root = lifted;
        } else {
            let side = self.side_of(pivot);
            self.links_mut(parent).set_child(side, lifted);
        }

        self.links_mut(lifted).set_child(direction, pivot);
        self.links_mut(pivot).parent = lifted;
    }

    // =========================================================================
    // Insertion Fix-up
    // =========================================================================

    /// Restores the red-black invariants after `node` was attached as a red
    /// leaf.
    ///
    /// On entry the only possible violation is `node` and its parent both
    /// being red. Each pass either terminates or moves that violation two
    /// levels up; at most one rotation pair is performed overall.
    fn insert_fix_up(&mut self, mut node: NodeId) {
        // The root's parent is the sentinel, which reads as black.
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            // A red parent is never the root, so the grandparent is real.
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                trace!(%node, %grandparent, "fix-up: recolor around red uncle");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if node == self.child(parent, side.opposite()) {
                trace!(%node, %parent, "fix-up: rotate inner grandchild outward");
                node = parent;
                self.rotate(node, side);
            }

            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            trace!(%node, %grandparent, "fix-up: rotate at grandparent");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
    /// Inserts an entry and returns its handle.
    ///
    /// Insertion always succeeds and always grows the tree by one: an entry
    /// whose key equals an existing one is kept alongside it, to its right.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let one = tree.insert(1, "one");
    /// tree.insert(1, "uno");
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.node(one).map(|node| *node.value()), Some("one"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> NodeId {
        let mut parent = NodeId::SENTINEL;
        let mut side = Direction::Left;
        let mut current = self.root;

        // Equal keys go right, which keeps them in insertion order.
        while let Some(slot) = current.slot() {
            let node = &self.nodes[slot];
            parent = current;
            side = if key < node.key {
                Direction::Left
            } else {
                Direction::Right
            };
            current = node.links.child(side);
        }

        let id = NodeId::from_slot(self.nodes.len());
        self.nodes.push(Node::new_red(key, value, parent));
        if parent.is_sentinel() {
            self.root = id;
        } else {
            self.links_mut(parent).set_child(side, id);
        }

        self.insert_fix_up(id);
        trace!(node = %id, len = self.len(), "inserted");
        id
    }

    /// Finds the node whose key equals `key`.
    ///
    /// Returns `None` when no such key was inserted. When several entries
    /// share the key, the one inserted first is returned.
    ///
    /// The descent does not stop at the first equal node: rotations can lift
    /// a later duplicate above an earlier one, and the earliest is always the
    /// leftmost equal node in key order.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let hello = tree.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(tree.search("hello"), Some(hello));
    /// assert_eq!(tree.search("world"), None);
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        let mut found = None;

        // Equal keys sit in insertion order along the in-order sequence, so
        // keep descending left from a match to reach the earliest one.
        while let Some(slot) = current.slot() {
            let node = &self.nodes[slot];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.links.left,
                Ordering::Equal => {
                    found = Some(current);
                    node.links.left
                }
                Ordering::Greater => node.links.right,
            };
        }
        found
    }

    /// Returns a reference to the value of the first entry inserted with
    /// `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack::tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(4, false);
    /// tree.insert(3, true);
    ///
    /// assert_eq!(tree.get(&3), Some(&true));
    /// assert_eq!(tree.get(&4), Some(&false));
    /// assert_eq!(tree.get(&5), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the key and value of the first entry inserted with `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = &self.nodes[self.search(key)?.slot()?];
        Some((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value of the first entry inserted
    /// with `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(key)?;
        self.value_mut(id)
    }

    /// Returns `true` if at least one entry has `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for RedBlackTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut tree = Self::with_capacity(iter.size_hint().0);
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedBlackTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for RedBlackTree<K, V> {
    type Item = (K, V);
    type IntoIter = RedBlackTreeIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        RedBlackTreeIntoIterator::new(self)
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = RedBlackTreeIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Trees are equal when they hold the same entries in the same key order,
/// whatever their shapes.
impl<K: PartialEq, V: PartialEq> PartialEq for RedBlackTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RedBlackTree<K, V> {}

impl<K: Hash, V: Hash> Hash for RedBlackTree<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for RedBlackTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for RedBlackTree<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        // A sequence of pairs rather than a map: duplicate keys must survive.
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for entry in self {
            sequence.serialize_element(&entry)?;
        }
        sequence.end()
    }
}

/// Upper bound on the arena reserved from an untrusted length hint.
#[cfg(feature = "serde")]
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

#[cfg(feature = "serde")]
struct RedBlackTreeVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> RedBlackTreeVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for RedBlackTreeVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = RedBlackTree<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of key-value pairs")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // Replaying inserts in order keeps equal keys in their original order.
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED_ENTRIES);
        let mut tree = RedBlackTree::with_capacity(capacity);
        while let Some((key, value)) = access.next_element::<(K, V)>()? {
            tree.insert(key, value);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for RedBlackTree<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackTreeVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
