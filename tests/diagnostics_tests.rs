#![cfg(feature = "diagnostics")]
//! Tests for the shape predicates, invariant checker, and renderers.

use arbor::prelude::*;
use proptest::prelude::*;
use rstest::rstest;

// =============================================================================
// Predicate Tests
// =============================================================================

#[rstest]
fn test_plain_chain_is_unbalanced_but_valid() {
    let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Plain, 1..=5);
    assert!(!tree.is_balanced());
    assert!(!tree.is_full());
    assert!(!tree.is_complete());
    assert!(!tree.is_perfect());
    assert_eq!(tree.check_invariants(), Ok(()));
}

#[rstest]
fn test_avl_from_sorted_keys_is_perfect_at_powers_of_two() {
    let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Avl, 1..=15);
    assert!(tree.is_balanced());
    assert!(tree.is_full());
    assert!(tree.is_complete());
    assert!(tree.is_perfect());
    assert_eq!(tree.height(), 4);
}

#[rstest]
fn test_empty_tree_satisfies_every_predicate() {
    let tree: OrderedTree<i32, ()> = OrderedTree::default();
    assert!(tree.is_balanced());
    assert!(tree.is_full());
    assert!(tree.is_complete());
    assert!(tree.is_perfect());
    assert_eq!(tree.check_invariants(), Ok(()));
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[rstest]
fn test_sideways_rendering_of_chain() {
    let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Plain, [1, 2, 3]);
    assert_eq!(tree.render(TreeLayout::Sideways), "        3\n    2\n1");
    assert_eq!(tree.render(TreeLayout::Levels), "1\n2\n3");
}

#[rstest]
fn test_default_layout_is_sideways() {
    assert_eq!(TreeLayout::default(), TreeLayout::Sideways);
}

#[rstest]
fn test_report_for_plain_tree() {
    let mut tree = OrderedTree::from_entries(Balancing::Plain, [(2, 20), (1, 10), (3, 30)]);
    tree.insert_key(4);
    let report = tree.report();

    assert_eq!(report.balancing, Balancing::Plain);
    assert_eq!(report.size, 4);
    assert_eq!(report.height, 3);
    assert!(report.balanced);
    assert!(!report.full);
    assert!(!report.complete);
    assert!(!report.perfect);
    assert_eq!(
        report.orders[0],
        (TraversalOrder::InOrder, "[1, 2, 3, 4]".to_string())
    );
    assert_eq!(
        report.values[1],
        (TraversalOrder::PreOrder, "[20, 10, 30, -]".to_string())
    );
    assert_eq!(report.picture, tree.render(TreeLayout::Sideways));

    let printed = report.to_string();
    let heading = "OrderedTree (plain)\nSize: 4\nHeight: 3\n";
    assert!(printed.starts_with(heading));
    assert!(printed.contains("\nKeys, level-order: [2, 1, 3, 4]\n"));
    assert!(printed.contains("\nValues, post-order: [10, -, 30, 20]\n"));
    assert!(printed.ends_with("Tree:\n        4\n    3\n2\n    1"));
}

// =============================================================================
// Invariant Laws
// =============================================================================

proptest! {
    /// Law: both modes pass the invariant checker after any mutation sequence.
    #[test]
    fn prop_invariants_hold_after_mutations(
        avl in any::<bool>(),
        inserts in prop::collection::vec(-500_i32..500, 0..200),
        removes in prop::collection::vec(-500_i32..500, 0..200)
    ) {
        let balancing = if avl {
            Balancing::Avl
        } else {
            Balancing::Plain
        };
        let mut tree: OrderedTree<i32, ()> = OrderedTree::from_keys(balancing, inserts);
        for key in removes {
            let _ = tree.remove(&key);
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }

    /// Law: an AVL tree is always balanced.
    #[test]
    fn prop_avl_is_balanced(keys in prop::collection::vec(any::<i32>(), 0..300)) {
        let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Avl, keys);
        prop_assert!(tree.is_balanced());
    }

    /// Law: a perfect tree is also full, complete, and balanced.
    #[test]
    fn prop_perfect_implies_other_shapes(keys in prop::collection::vec(0_u8..32, 0..32)) {
        let tree: OrderedTree<u8, ()> = OrderedTree::from_keys(Balancing::Plain, keys);
        if tree.is_perfect() {
            prop_assert!(tree.is_full());
            prop_assert!(tree.is_complete());
            prop_assert!(tree.is_balanced());
        }
    }

    /// Law: the level layout has one line per level and one token per entry.
    #[test]
    fn prop_level_layout_matches_shape(keys in prop::collection::vec(any::<i16>(), 0..100)) {
        let tree: OrderedTree<i16, ()> = OrderedTree::from_keys(Balancing::Plain, keys);
        let rendered = tree.render(TreeLayout::Levels);
        prop_assert_eq!(rendered.lines().count(), tree.height());
        prop_assert_eq!(rendered.split_whitespace().count(), tree.len());
    }
}
