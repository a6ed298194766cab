//! Integration tests for RedBlackTree.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use redblack::prelude::*;
use rstest::rstest;

/// Largest height a red-black tree with `len` entries may reach.
fn height_bound(len: usize) -> usize {
    (2.0 * ((len + 1) as f64).log2()).floor() as usize
}

fn walked_values<K, V: Clone>(tree: &RedBlackTree<K, V>) -> Vec<V> {
    let mut values = Vec::with_capacity(tree.len());
    tree.walk(|value| values.push(value.clone()));
    values
}

// =============================================================================
// Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_tree() {
    let tree: RedBlackTree<i32, String> = RedBlackTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), 0);
    assert!(tree.root_node().is_none());
    assert!(walked_values(&tree).is_empty());
}

#[rstest]
fn test_default_creates_empty_tree() {
    let tree: RedBlackTree<i32, String> = RedBlackTree::default();
    assert!(tree.is_empty());
}

#[rstest]
fn test_with_capacity_creates_empty_tree() {
    let mut tree: RedBlackTree<i32, i32> = RedBlackTree::with_capacity(64);
    assert!(tree.is_empty());
    tree.reserve(16);
    tree.insert(1, 1);
    assert_eq!(tree.len(), 1);
}

// =============================================================================
// Walk Tests
// =============================================================================

#[rstest]
#[case::ascending((0..10).collect())]
#[case::descending((0..10).rev().collect())]
#[case::interleaved(vec![5, 0, 9, 1, 8, 2, 7, 3, 6, 4])]
fn test_walk_yields_values_in_key_order(#[case] keys: Vec<i32>) {
    let mut tree = RedBlackTree::new();
    for key in keys {
        tree.insert(key, key);
    }

    assert_eq!(tree.len(), 10);
    assert_eq!(walked_values(&tree), (0..10).collect::<Vec<_>>());
}

#[rstest]
fn test_walk_entries_pairs_keys_with_values() {
    let mut tree = RedBlackTree::new();
    tree.insert("b", 2);
    tree.insert("a", 1);
    tree.insert("c", 3);

    let mut entries = Vec::new();
    tree.walk_entries(|key, value| entries.push((*key, *value)));
    assert_eq!(entries, vec![("a", 1), ("b", 2), ("c", 3)]);
}

// =============================================================================
// Search Tests
// =============================================================================

#[rstest]
fn test_search_after_inserting_evens_and_three() {
    let mut tree = RedBlackTree::new();
    for key in (0..20).step_by(2) {
        tree.insert(key, false);
    }
    tree.insert(3, true);

    let three = tree.search(&3).and_then(|id| tree.node(id));
    assert_eq!(three.map(|node| *node.value()), Some(true));
    let four = tree.search(&4).and_then(|id| tree.node(id));
    assert_eq!(four.map(|node| *node.value()), Some(false));
    assert_eq!(tree.search(&5), None);
    assert_eq!(tree.len(), 11);
}

#[rstest]
#[case(-1)]
#[case(1)]
#[case(19)]
#[case(100)]
fn test_search_absent_key(#[case] key: i32) {
    let tree: RedBlackTree<i32, ()> = (0..20).step_by(2).map(|key| (key, ())).collect();
    assert_eq!(tree.search(&key), None);
    assert_eq!(tree.get(&key), None);
    assert!(!tree.contains_key(&key));
}

#[rstest]
fn test_search_returns_handle_of_inserted_node() {
    let mut tree = RedBlackTree::new();
    let ids: Vec<NodeId> = (0..50).map(|key| tree.insert(key, key)).collect();
    for (key, id) in (0..50).zip(ids) {
        assert_eq!(tree.search(&key), Some(id));
    }
}

#[rstest]
fn test_get_key_value_with_borrowed_key() {
    let mut tree = RedBlackTree::new();
    tree.insert("apple".to_string(), 1);
    tree.insert("pear".to_string(), 2);

    assert_eq!(tree.get_key_value("pear"), Some((&"pear".to_string(), &2)));
    assert_eq!(tree.get("plum"), None);
}

// =============================================================================
// Duplicate Key Tests
// =============================================================================

#[rstest]
fn test_duplicates_are_all_kept() {
    let mut tree = RedBlackTree::new();
    for round in 0..5 {
        tree.insert(1, round);
        tree.insert(0, round);
    }

    assert_eq!(tree.len(), 10);
    assert_eq!(walked_values(&tree), vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
}

#[rstest]
#[case::three(3)]
#[case::seven(7)]
#[case::many(100)]
fn test_search_finds_first_inserted_duplicate(#[case] copies: usize) {
    let mut tree = RedBlackTree::new();
    tree.insert(10, usize::MAX);
    tree.insert(-10, usize::MAX);
    let first = tree.insert(0, 0);
    for copy in 1..copies {
        tree.insert(0, copy);
    }

    assert_eq!(tree.search(&0), Some(first));
    assert_eq!(tree.get(&0), Some(&0));
    assert!(tree.validate().is_ok());
}

#[rstest]
fn test_get_mut_targets_first_duplicate() {
    let mut tree = RedBlackTree::new();
    tree.insert('x', 1);
    tree.insert('x', 2);
    if let Some(value) = tree.get_mut(&'x') {
        *value = 10;
    }
    assert_eq!(walked_values(&tree), vec![10, 2]);
}

// =============================================================================
// Height Tests
// =============================================================================

#[rstest]
fn test_height_bound_for_ascending_inserts() {
    let mut tree = RedBlackTree::new();
    for key in 0..100 {
        tree.insert(key, ());
        assert!(
            tree.height() <= height_bound(tree.len()),
            "height {} exceeds bound after {} inserts",
            tree.height(),
            tree.len()
        );
    }
}

#[rstest]
fn test_height_bound_for_descending_inserts() {
    let mut tree = RedBlackTree::new();
    for key in (1..=100).rev() {
        tree.insert(key, ());
        assert!(
            tree.height() <= height_bound(tree.len()),
            "height {} exceeds bound after {} inserts",
            tree.height(),
            tree.len()
        );
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn test_shuffled_inserts_stay_balanced_and_sorted(#[case] seed: u64) {
    let mut keys: Vec<u32> = (0..500).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut tree = RedBlackTree::new();
    for key in keys {
        tree.insert(key, key);
        assert!(tree.height() <= height_bound(tree.len()));
    }

    assert!(tree.validate().is_ok());
    assert_eq!(walked_values(&tree), (0..500).collect::<Vec<_>>());
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(3, 2)]
#[case(5, 3)]
#[case(7, 4)]
fn test_height_of_small_ascending_trees(#[case] len: i32, #[case] expected: usize) {
    let tree: RedBlackTree<i32, ()> = (0..len).map(|key| (key, ())).collect();
    assert_eq!(tree.height(), expected);
}

// =============================================================================
// Node View Tests
// =============================================================================

#[rstest]
fn test_root_is_black_and_has_no_parent() {
    let tree: RedBlackTree<i32, ()> = (0..25).map(|key| (key, ())).collect();
    let root = tree.root_node().unwrap();
    assert_eq!(root.color(), Color::Black);
    assert!(!root.is_red());
    assert!(root.parent().is_none());
}

#[rstest]
fn test_children_point_back_to_parent() {
    let tree: RedBlackTree<i32, ()> = (0..25).map(|key| (key, ())).collect();
    let root = tree.root_node().unwrap();
    for child in [root.left(), root.right()].into_iter().flatten() {
        assert_eq!(child.parent().map(|parent| parent.id()), Some(root.id()));
    }
}

#[rstest]
fn test_node_view_exposes_entry() {
    let mut tree = RedBlackTree::new();
    let id = tree.insert(4, "four");
    let node = tree.node(id).unwrap();
    assert_eq!(node.id(), id);
    assert_eq!(node.key(), &4);
    assert_eq!(node.value(), &"four");
    assert_eq!(id.insertion_index(), 0);
}

// =============================================================================
// Query Tests
// =============================================================================

#[rstest]
fn test_min_and_max() {
    let tree: RedBlackTree<i32, char> = [(5, 'e'), (2, 'b'), (8, 'h'), (1, 'a')]
        .into_iter()
        .collect();
    assert_eq!(tree.min(), Some((&1, &'a')));
    assert_eq!(tree.max(), Some((&8, &'h')));
}

#[rstest]
fn test_keys_and_values_follow_key_order() {
    let tree: RedBlackTree<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
}

#[rstest]
fn test_extend_appends_entries() {
    let mut tree: RedBlackTree<i32, i32> = (0..5).map(|key| (key, key)).collect();
    tree.extend((5..10).map(|key| (key, key)));
    assert_eq!(tree.len(), 10);
    assert_eq!(walked_values(&tree), (0..10).collect::<Vec<_>>());
}

#[rstest]
fn test_clone_is_independent() {
    let original: RedBlackTree<i32, i32> = (0..10).map(|key| (key, key)).collect();
    let mut copy = original.clone();
    copy.insert(10, 10);
    assert_eq!(original.len(), 10);
    assert_eq!(copy.len(), 11);
    assert!(copy.validate().is_ok());
}

#[rstest]
fn test_validate_reports_stats() {
    let tree: RedBlackTree<i32, ()> = (0..1000).map(|key| (key, ())).collect();
    let stats = tree.validate().unwrap();
    assert_eq!(stats.len, 1000);
    assert_eq!(stats.height, tree.height());
    assert!(stats.height <= height_bound(1000));
    assert!(stats.black_height >= stats.height / 2);
}
