//! In-order iterators over a [`RedBlackTree`].

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::{NodeId, RedBlackTree};

/// Ancestors kept inline before the stack spills to the heap. Heights stay
/// under `2 * log2(N + 1)`, so this covers trees of up to 2^24 entries.
const INLINE_DEPTH: usize = 48;

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over key-value pairs of a [`RedBlackTree`] in ascending key
/// order.
///
/// Created by [`RedBlackTree::iter`]. It walks the tree lazily, keeping only
/// the pending ancestors on a stack.
pub struct RedBlackTreeIterator<'a, K, V> {
    tree: &'a RedBlackTree<K, V>,
    stack: SmallVec<[NodeId; INLINE_DEPTH]>,
    remaining: usize,
}

impl<'a, K, V> RedBlackTreeIterator<'a, K, V> {
    pub(crate) fn new(tree: &'a RedBlackTree<K, V>) -> Self {
        let mut iterator = Self {
            tree,
            stack: SmallVec::new(),
            remaining: tree.len(),
        };
        iterator.descend_left(tree.root());
        iterator
    }

    fn descend_left(&mut self, mut node: NodeId) {
        while let Some(slot) = node.slot() {
            self.stack.push(node);
            node = self.tree.entry(slot).links.left;
        }
    }

    /// Advances to the next node and returns its arena slot.
    pub(crate) fn next_slot(&mut self) -> Option<usize> {
        let slot = self.stack.pop()?.slot()?;
        let right = self.tree.entry(slot).links.right;
        self.descend_left(right);
        self.remaining -= 1;
        Some(slot)
    }
}

impl<'a, K, V> Iterator for RedBlackTreeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let node = tree.entry(self.next_slot()?);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RedBlackTreeIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for RedBlackTreeIterator<'_, K, V> {}

impl<K, V> Clone for RedBlackTreeIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over key-value pairs of a [`RedBlackTree`] in ascending
/// key order.
pub struct RedBlackTreeIntoIterator<K, V> {
    entries: Vec<Option<(K, V)>>,
    order: std::vec::IntoIter<usize>,
}

impl<K, V> RedBlackTreeIntoIterator<K, V> {
    pub(crate) fn new(tree: RedBlackTree<K, V>) -> Self {
        let order = {
            let mut order = Vec::with_capacity(tree.len());
            let mut cursor = tree.iter();
            while let Some(slot) = cursor.next_slot() {
                order.push(slot);
            }
            order
        };
        let entries = tree
            .into_nodes()
            .into_iter()
            .map(|node| Some((node.key, node.value)))
            .collect();
        Self {
            entries,
            order: order.into_iter(),
        }
    }
}

impl<K, V> Iterator for RedBlackTreeIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        // Every slot appears exactly once in `order`.
        let entries = &mut self.entries;
        self.order.find_map(|slot| entries[slot].take())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> ExactSizeIterator for RedBlackTreeIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.order.len()
    }
}

impl<K, V> FusedIterator for RedBlackTreeIntoIterator<K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_iterator_reports_exact_length() {
        let tree: RedBlackTree<i32, i32> = (0..10).map(|key| (key, key)).collect();
        let mut iterator = tree.iter();
        assert_eq!(iterator.len(), 10);
        iterator.next();
        iterator.next();
        assert_eq!(iterator.len(), 8);
        assert_eq!(iterator.size_hint(), (8, Some(8)));
    }

    #[rstest]
    fn test_iterator_is_fused() {
        let tree: RedBlackTree<i32, ()> = std::iter::once((1, ())).collect();
        let mut iterator = tree.iter();
        assert_eq!(iterator.next(), Some((&1, &())));
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_cloned_iterator_resumes_independently() {
        let tree: RedBlackTree<i32, ()> = (0..5).map(|key| (key, ())).collect();
        let mut iterator = tree.iter();
        iterator.next();
        let rest: Vec<i32> = iterator.clone().map(|(key, _)| *key).collect();
        assert_eq!(rest, vec![1, 2, 3, 4]);
        assert_eq!(iterator.next(), Some((&1, &())));
    }

    #[rstest]
    fn test_deep_tree_spills_stack_without_losing_order() {
        let tree: RedBlackTree<u32, ()> = (0..100_000).rev().map(|key| (key, ())).collect();
        assert!(tree.iter().map(|(key, _)| *key).eq(0..100_000));
    }

    #[rstest]
    fn test_into_iterator_moves_entries_in_key_order() {
        let tree: RedBlackTree<i32, String> = [(2, "b"), (1, "a"), (3, "c"), (1, "z")]
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        let mut iterator = tree.into_iter();
        assert_eq!(iterator.len(), 4);
        let entries: Vec<(i32, String)> = iterator.by_ref().collect();
        assert_eq!(
            entries,
            vec![
                (1, "a".to_string()),
                (1, "z".to_string()),
                (2, "b".to_string()),
                (3, "c".to_string()),
            ]
        );
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_empty_tree_iterators() {
        let tree: RedBlackTree<i32, i32> = RedBlackTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.into_iter().next(), None);
    }
}
