//! Unit tests for tree traversals.

use arbor::tree::{
    Balancing, OrderedTree, STACK_INLINE_CAPACITY, Traversal, TraversalOrder, TreeError, traverse,
};
use rstest::{fixture, rstest};

/// Perfect tree of height 3; the insertion order needs no rotations.
fn build_perfect(balancing: Balancing) -> OrderedTree<i32, char> {
    OrderedTree::from_entries(
        balancing,
        [(5, 'e'), (3, 'c'), (8, 'h'), (1, 'a'), (4, 'd'), (7, 'g'), (9, 'i')],
    )
}

#[fixture]
fn perfect() -> OrderedTree<i32, char> {
    build_perfect(Balancing::Avl)
}

fn keys(traversal: Traversal<'_, i32, char>) -> Vec<i32> {
    traversal.map(|(key, _)| *key).collect()
}

// =============================================================================
// Order Tests
// =============================================================================

#[rstest]
#[case(TraversalOrder::InOrder, vec![1, 3, 4, 5, 7, 8, 9])]
#[case(TraversalOrder::PreOrder, vec![5, 3, 1, 4, 8, 7, 9])]
#[case(TraversalOrder::PostOrder, vec![1, 4, 3, 7, 9, 8, 5])]
#[case(TraversalOrder::LevelOrder, vec![5, 3, 8, 1, 4, 7, 9])]
fn test_orders_on_perfect_tree(
    #[values(Balancing::Plain, Balancing::Avl)] balancing: Balancing,
    #[case] order: TraversalOrder,
    #[case] expected: Vec<i32>,
) {
    let tree = build_perfect(balancing);
    assert_eq!(keys(tree.traverse(order)), expected);
}

#[rstest]
fn test_values_travel_with_keys(perfect: OrderedTree<i32, char>) {
    let letters: String = perfect
        .traverse(TraversalOrder::InOrder)
        .filter_map(|(_, value)| value.copied())
        .collect();
    assert_eq!(letters, "acdeghi");
}

#[rstest]
fn test_default_order_is_in_order(perfect: OrderedTree<i32, char>) {
    assert_eq!(TraversalOrder::default(), TraversalOrder::InOrder);
    assert_eq!(
        keys(perfect.iter()),
        keys(perfect.traverse(TraversalOrder::default()))
    );
}

#[rstest]
fn test_traversal_reports_its_order(perfect: OrderedTree<i32, char>) {
    for order in TraversalOrder::ALL {
        assert_eq!(perfect.traverse(order).order(), order);
    }
}

#[rstest]
fn test_free_traverse_over_subtree(perfect: OrderedTree<i32, char>) {
    let right = perfect.root().and_then(|root| root.right());
    assert_eq!(
        keys(traverse(right, TraversalOrder::PostOrder)),
        vec![7, 9, 8]
    );
}

// =============================================================================
// Laziness and Restart Tests
// =============================================================================

#[rstest]
fn test_clone_restarts_from_current_position(perfect: OrderedTree<i32, char>) {
    let mut traversal = perfect.traverse(TraversalOrder::LevelOrder);
    assert_eq!(traversal.next().map(|(key, _)| *key), Some(5));

    let resumed = traversal.clone();
    assert_eq!(keys(traversal), vec![3, 8, 1, 4, 7, 9]);
    assert_eq!(keys(resumed), vec![3, 8, 1, 4, 7, 9]);
}

#[rstest]
fn test_each_call_starts_over(perfect: OrderedTree<i32, char>) {
    let first: Vec<i32> = perfect
        .traverse(TraversalOrder::PreOrder)
        .take(3)
        .map(|(key, _)| *key)
        .collect();
    let second: Vec<i32> = perfect
        .traverse(TraversalOrder::PreOrder)
        .take(3)
        .map(|(key, _)| *key)
        .collect();
    assert_eq!(first, second);
}

#[rstest]
fn test_exhausted_traversal_stays_exhausted(perfect: OrderedTree<i32, char>) {
    let mut traversal = perfect.traverse(TraversalOrder::PostOrder);
    assert_eq!(traversal.by_ref().count(), 7);
    assert!(traversal.next().is_none());
    assert!(traversal.next().is_none());
}

#[rstest]
#[case(TraversalOrder::InOrder)]
#[case(TraversalOrder::PreOrder)]
#[case(TraversalOrder::PostOrder)]
#[case(TraversalOrder::LevelOrder)]
fn test_empty_tree_yields_nothing(#[case] order: TraversalOrder) {
    let tree: OrderedTree<i32, char> = OrderedTree::plain();
    assert_eq!(tree.traverse(order).count(), 0);
    assert_eq!(tree.to_string_with(order), "[]");
}

#[rstest]
fn test_deep_plain_tree_traverses_past_inline_capacity() {
    let depth = i32::try_from(STACK_INLINE_CAPACITY * 4).unwrap_or(128);
    let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Plain, (0..depth).rev());
    assert_eq!(tree.height(), STACK_INLINE_CAPACITY * 4);
    for order in TraversalOrder::ALL {
        assert_eq!(tree.traverse(order).count(), STACK_INLINE_CAPACITY * 4);
    }
    let post: Vec<i32> = tree.traverse(TraversalOrder::PostOrder).map(|(key, _)| *key).collect();
    assert_eq!(post, (0..depth).collect::<Vec<_>>());
}

// =============================================================================
// Order Name Tests
// =============================================================================

#[rstest]
#[case("in-order", TraversalOrder::InOrder)]
#[case("InOrder", TraversalOrder::InOrder)]
#[case("pre_order", TraversalOrder::PreOrder)]
#[case("POST-ORDER", TraversalOrder::PostOrder)]
#[case("level order", TraversalOrder::LevelOrder)]
fn test_order_names_parse(#[case] name: &str, #[case] expected: TraversalOrder) {
    assert_eq!(name.parse::<TraversalOrder>(), Ok(expected));
}

#[rstest]
fn test_unknown_order_name_is_rejected() {
    assert_eq!(
        "zigzag".parse::<TraversalOrder>(),
        Err(TreeError::UnknownOrder("zigzag".to_string()))
    );
}

#[rstest]
fn test_order_display_round_trips() {
    let names: Vec<String> = TraversalOrder::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(
        names,
        vec!["in-order", "pre-order", "post-order", "level-order"]
    );
}
