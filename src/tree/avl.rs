//! Balancing policies applied on the unwind path of every mutation.
//!
//! The search engine in [`search`](super::search) knows nothing about
//! balance. After it changes a subtree it hands every ancestor, bottom-up,
//! to [`BalancePolicy::restore`], which is the only place shape decisions
//! are made.
//!
//! - [`Unbalanced`] keeps the cached heights correct and nothing else.
//! - [`AvlBalancer`] additionally keeps every balance factor in `[-1, 1]`
//!   with at most two rotations per ancestor.
//!
//! # Rotation Cases
//!
//! | Balance factor | Heavy grandchild | Action                                |
//! |----------------|------------------|---------------------------------------|
//! | `> 1`          | left-left        | rotate right at the node              |
//! | `> 1`          | left-right       | rotate left at the left child, then right |
//! | `< -1`         | right-right      | rotate left at the node               |
//! | `< -1`         | right-left       | rotate right at the right child, then left |
//!
//! The heavy grandchild is read from the child's balance factor. After an
//! insert this selects the same case as comparing the inserted key with the
//! child's key; after a removal it is the only information available.

use super::node::OrderedNode;

/// Restores the shape invariants of one subtree root.
///
/// Implementations receive a node whose children are already valid and
/// return the new root of that subtree. They must leave the cached height of
/// the returned root correct.
pub trait BalancePolicy {
    /// Recomputes bookkeeping for `node` and restructures it if required.
    fn restore<K, V>(node: Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>>;
}

/// Policy of a plain binary search tree: heights are tracked, shape is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unbalanced;

impl BalancePolicy for Unbalanced {
    #[inline]
    fn restore<K, V>(mut node: Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>> {
        node.update_height();
        node
    }
}

/// Policy of an AVL tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvlBalancer;

impl BalancePolicy for AvlBalancer {
    fn restore<K, V>(mut node: Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>> {
        node.update_height();
        let balance_factor = node.balance_factor();

        let restored = if balance_factor > 1 {
            if node
                .left
                .as_ref()
                .is_some_and(|left| left.balance_factor() < 0)
            {
                log::trace!("avl: left-right case at height {}", node.height);
                node.left = node.left.take().map(rotate_left);
            } else {
                log::trace!("avl: left-left case at height {}", node.height);
            }
            rotate_right(node)
        } else if balance_factor < -1 {
            if node
                .right
                .as_ref()
                .is_some_and(|right| right.balance_factor() > 0)
            {
                log::trace!("avl: right-left case at height {}", node.height);
                node.right = node.right.take().map(rotate_right);
            } else {
                log::trace!("avl: right-right case at height {}", node.height);
            }
            rotate_left(node)
        } else {
            node
        };

        debug_assert!(
            (-1..=1).contains(&restored.balance_factor()),
            "AVL restore left balance factor {}",
            restored.balance_factor()
        );
        debug_assert_eq!(restored.height, restored.computed_height());
        restored
    }
}

/// Rotates the subtree right around `node`; its left child becomes the root.
///
/// ```text
///       y            x
///      / \          / \
///     x   C  ==>   A   y
///    / \              / \
///   A   B            B   C
/// ```
///
/// Only `y` and `x` have their heights recomputed, in that order.
pub fn rotate_right<K, V>(mut node: Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>> {
    debug_assert!(node.left.is_some(), "rotate_right needs a left child");
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// Rotates the subtree left around `node`; its right child becomes the root.
///
/// Mirror image of [`rotate_right`].
pub fn rotate_left<K, V>(mut node: Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>> {
    debug_assert!(node.right.is_some(), "rotate_left needs a right child");
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

// =============================================================================
// Tests
// =============================================================================
