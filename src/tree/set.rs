//! Key-only variant of [`RedBlackTree`].

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use super::{NodeId, RedBlackTree, RedBlackTreeIntoIterator, RedBlackTreeIterator, TreeStats};
use crate::error::InvariantViolation;

/// An ordered multiset based on a red-black tree.
///
/// Every inserted key is kept, duplicates included, and iteration yields keys
/// in ascending order.
///
/// # Examples
///
/// ```rust
/// use redblack::tree::RedBlackSet;
///
/// let set: RedBlackSet<i32> = [5, 1, 3, 1].into_iter().collect();
/// assert_eq!(set.len(), 4);
/// assert!(set.contains(&3));
/// assert!(!set.contains(&2));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 1, 3, 5]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RedBlackSet<K> {
    tree: RedBlackTree<K, ()>,
}

impl<K> RedBlackSet<K> {
    /// Creates a new empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RedBlackTree::new(),
        }
    }

    /// Creates an empty set with room for `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RedBlackTree::with_capacity(capacity),
        }
    }

    /// Returns the number of keys, counting every duplicate.
    #[inline]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set holds no keys.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the key behind `id`.
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.tree.node(id).map(|node| node.key())
    }

    /// Visits every key in ascending order.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&K),
    {
        self.tree.walk_entries(|key, ()| visitor(key));
    }

    /// Returns the smallest key.
    pub fn min(&self) -> Option<&K> {
        self.tree.min().map(|(key, ())| key)
    }

    /// Returns the largest key.
    pub fn max(&self) -> Option<&K> {
        self.tree.max().map(|(key, ())| key)
    }

    /// Returns an iterator over keys in ascending order.
    pub fn iter(&self) -> RedBlackSetIterator<'_, K> {
        RedBlackSetIterator {
            inner: self.tree.iter(),
        }
    }

    /// Returns the underlying tree.
    pub const fn as_tree(&self) -> &RedBlackTree<K, ()> {
        &self.tree
    }
}

impl<K: Ord> RedBlackSet<K> {
    /// Inserts a key and returns its handle. Duplicates are kept.
    pub fn insert(&mut self, key: K) -> NodeId {
        self.tree.insert(key, ())
    }

    /// Finds the first inserted node holding `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search(key)
    }

    /// Returns `true` if `key` was inserted at least once.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Checks every red-black invariant of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        self.tree.validate()
    }
}

impl<K> Default for RedBlackSet<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for RedBlackSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().map(|key| (key, ())).collect(),
        }
    }
}

impl<K: Ord> Extend<K> for RedBlackSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.tree.extend(iter.into_iter().map(|key| (key, ())));
    }
}

impl<K: fmt::Debug> fmt::Debug for RedBlackSet<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over keys of a [`RedBlackSet`] in ascending order.
pub struct RedBlackSetIterator<'a, K> {
    inner: RedBlackTreeIterator<'a, K, ()>,
}

impl<'a, K> Iterator for RedBlackSetIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, ())| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for RedBlackSetIterator<'_, K> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K> FusedIterator for RedBlackSetIterator<'_, K> {}

impl<'a, K> IntoIterator for &'a RedBlackSet<K> {
    type Item = &'a K;
    type IntoIter = RedBlackSetIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for RedBlackSet<K> {
    type Item = K;
    type IntoIter = std::iter::Map<RedBlackTreeIntoIterator<K, ()>, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        let key_of: fn((K, ())) -> K = |(key, ())| key;
        self.tree.into_iter().map(key_of)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize> serde::Serialize for RedBlackSet<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for RedBlackSet<K>
where
    K: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Replaying the sequence in order keeps equal keys in their given
        // relative order.
        let keys = Vec::<K>::deserialize(deserializer)?;
        Ok(keys.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_set_is_empty() {
        let set: RedBlackSet<i32> = RedBlackSet::new();
        assert!(set.is_empty());
        assert_eq!(set.height(), 0);
        assert_eq!(set.min(), None);
    }

    #[rstest]
    fn test_key_by_handle() {
        let mut set = RedBlackSet::new();
        let id = set.insert("pear");
        set.insert("apple");
        assert_eq!(set.key(id), Some(&"pear"));
        assert_eq!(set.search("pear"), Some(id));
    }

    #[rstest]
    fn test_owned_iteration_in_order() {
        let set: RedBlackSet<u8> = [9, 3, 7, 3].into_iter().collect();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![3, 3, 7, 9]);
    }

    #[rstest]
    fn test_debug_as_set() {
        let set: RedBlackSet<i32> = [2, 1].into_iter().collect();
        assert_eq!(format!("{set:?}"), "{1, 2}");
    }
}
