//! Comparison-driven primitives shared by every balancing mode.
//!
//! All mutating functions take ownership of a subtree and give back its new
//! root. The descent detaches each visited node from its parent and keeps it
//! on an explicit path; on the way back every ancestor of a changed position
//! is passed through the policy `P` and reattached, which is how the AVL
//! balancer gets to see each level without this module knowing about
//! rotations.
//!
//! Nothing here recurses, so a plain tree degenerated into a chain costs
//! O(depth) time and heap, never call stack.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use super::avl::BalancePolicy;
use super::node::{Link, OrderedNode};

/// A removed entry: its key and its (possibly absent) value.
pub type Entry<K, V> = (K, Option<V>);

/// Which child of a detached ancestor the descent continued into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Ancestors detached on the way down, root first.
type Path<K, V> = Vec<(Box<OrderedNode<K, V>>, Side)>;

/// Applied to each ancestor while it is reattached.
type Settle<K, V> = fn(Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>>;

const fn slot<K, V>(node: &mut OrderedNode<K, V>, side: Side) -> &mut Link<K, V> {
    match side {
        Side::Left => &mut node.left,
        Side::Right => &mut node.right,
    }
}

const fn unchanged<K, V>(node: Box<OrderedNode<K, V>>) -> Box<OrderedNode<K, V>> {
    node
}

/// Hangs `node` back below the detached ancestors, settling each one.
fn reattach<K, V>(
    path: Path<K, V>,
    node: Box<OrderedNode<K, V>>,
    settle: Settle<K, V>,
) -> Box<OrderedNode<K, V>> {
    path.into_iter().rev().fold(node, |child, (mut parent, side)| {
        *slot(&mut parent, side) = Some(child);
        settle(parent)
    })
}

/// Like [`reattach`], but the subtree at the bottom of the path may be gone.
fn reattach_link<K, V>(mut path: Path<K, V>, link: Link<K, V>, settle: Settle<K, V>) -> Link<K, V> {
    let node = match link {
        Some(node) => node,
        None => {
            let (mut parent, side) = path.pop()?;
            *slot(&mut parent, side) = None;
            settle(parent)
        }
    };
    Some(reattach(path, node, settle))
}

/// Inserts `key` with `value` below `link`.
///
/// Returns the new subtree root and whether an entry was added. If the key
/// is already present the subtree is returned unchanged, the existing value
/// is kept, and the offered value is dropped.
///
/// # Examples
///
/// ```rust
/// use arbor::tree::search;
/// use arbor::tree::AvlBalancer;
///
/// let (root, inserted) = search::insert::<_, _, AvlBalancer>(None, 1, Some("one"));
/// assert!(inserted);
/// let (root, inserted) = search::insert::<_, _, AvlBalancer>(Some(root), 1, Some("uno"));
/// assert!(!inserted);
/// assert_eq!(root.value(), Some(&"one"));
/// ```
pub fn insert<K: Ord, V, P: BalancePolicy>(
    link: Link<K, V>,
    key: K,
    value: Option<V>,
) -> (Box<OrderedNode<K, V>>, bool) {
    let mut path: Path<K, V> = Vec::new();
    let mut current = link;

    while let Some(mut node) = current {
        let side = match key.cmp(&node.key) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return (reattach(path, node, unchanged), false),
        };
        current = slot(&mut node, side).take();
        path.push((node, side));
    }

    let leaf = Box::new(OrderedNode::leaf(key, value));
    (reattach(path, leaf, P::restore), true)
}

/// Finds the node holding `key`.
pub fn find<'a, K, V, Q>(
    link: Option<&'a OrderedNode<K, V>>,
    key: &Q,
) -> Option<&'a OrderedNode<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link;
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

/// Finds the value slot of the node holding `key`.
///
/// Only the value is handed out; the key and the links stay private so the
/// ordering cannot be broken through the returned reference.
pub fn find_mut<'a, K, V, Q>(
    link: Option<&'a mut OrderedNode<K, V>>,
    key: &Q,
) -> Option<&'a mut Option<V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link;
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left.as_deref_mut(),
            Ordering::Greater => node.right.as_deref_mut(),
            Ordering::Equal => return Some(&mut node.value),
        };
    }
    None
}

/// Returns the node with the smallest key.
pub fn min<K, V>(link: Option<&OrderedNode<K, V>>) -> Option<&OrderedNode<K, V>> {
    let mut current = link?;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    Some(current)
}

/// Returns the node with the largest key.
pub fn max<K, V>(link: Option<&OrderedNode<K, V>>) -> Option<&OrderedNode<K, V>> {
    let mut current = link?;
    while let Some(right) = current.right.as_deref() {
        current = right;
    }
    Some(current)
}

/// Removes `key` from the subtree below `link`.
///
/// Returns the new subtree root and the removed entry, or `None` as the
/// entry when the key is absent (in which case the subtree is unchanged).
///
/// A node with two children is not unlinked itself: it takes over the entry
/// of its in-order successor (the minimum of its right subtree), and the
/// successor's node is detached from the right subtree instead.
pub fn remove<K, V, Q, P>(link: Link<K, V>, key: &Q) -> (Link<K, V>, Option<Entry<K, V>>)
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    P: BalancePolicy,
{
    let mut path: Path<K, V> = Vec::new();
    let mut current = link;

    while let Some(mut node) = current {
        let side = match key.cmp(node.key.borrow()) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                let (replacement, entry) = unlink::<K, V, P>(node);
                return (reattach_link(path, replacement, P::restore), Some(entry));
            }
        };
        current = slot(&mut node, side).take();
        path.push((node, side));
    }

    (reattach_link(path, None, unchanged), None)
}

/// Removes the smallest entry of a non-empty subtree.
pub fn remove_min<K, V, P: BalancePolicy>(
    root: Box<OrderedNode<K, V>>,
) -> (Link<K, V>, Entry<K, V>) {
    let (rest, node) = detach_extreme::<K, V, P>(root, Side::Left);
    (rest, node.into_entry())
}

/// Removes the largest entry of a non-empty subtree.
pub fn remove_max<K, V, P: BalancePolicy>(
    root: Box<OrderedNode<K, V>>,
) -> (Link<K, V>, Entry<K, V>) {
    let (rest, node) = detach_extreme::<K, V, P>(root, Side::Right);
    (rest, node.into_entry())
}

/// Takes the entry out of a matched node and returns what replaces it.
fn unlink<K, V, P: BalancePolicy>(mut node: Box<OrderedNode<K, V>>) -> (Link<K, V>, Entry<K, V>) {
    match (node.left.take(), node.right.take()) {
        (None, None) => (None, node.into_entry()),
        (Some(child), None) | (None, Some(child)) => (Some(child), node.into_entry()),
        (Some(left), Some(right)) => {
            let (rest, successor) = detach_extreme::<K, V, P>(right, Side::Left);
            let (successor_key, successor_value) = successor.into_entry();
            let removed_key = mem::replace(&mut node.key, successor_key);
            let removed_value = mem::replace(&mut node.value, successor_value);
            node.left = Some(left);
            node.right = rest;
            (Some(P::restore(node)), (removed_key, removed_value))
        }
    }
}

/// Unlinks the outermost node on `side`, splicing its other subtree into
/// its place.
///
/// The returned node has no children.
fn detach_extreme<K, V, P: BalancePolicy>(
    root: Box<OrderedNode<K, V>>,
    side: Side,
) -> (Link<K, V>, Box<OrderedNode<K, V>>) {
    let mut path: Path<K, V> = Vec::new();
    let mut node = root;
    while let Some(next) = slot(&mut node, side).take() {
        path.push((node, side));
        node = next;
    }

    let other = match side {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
    };
    let rest = slot(&mut node, other).take();
    node.height = 1;
    (reattach_link(path, rest, P::restore), node)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::avl::{AvlBalancer, Unbalanced};
    use crate::tree::node::{dismantle, height_of};
    use rstest::rstest;

    fn build<P: BalancePolicy>(keys: &[i32]) -> Link<i32, String> {
        keys.iter().fold(None, |link, &key| {
            let (root, _) = insert::<_, _, P>(link, key, Some(format!("v{key}")));
            Some(root)
        })
    }

    fn in_order(link: Option<&OrderedNode<i32, String>>, keys: &mut Vec<i32>) {
        if let Some(node) = link {
            in_order(node.left(), keys);
            keys.push(node.key);
            in_order(node.right(), keys);
        }
    }

    fn keys_of(link: &Link<i32, String>) -> Vec<i32> {
        let mut keys = Vec::new();
        in_order(link.as_deref(), &mut keys);
        keys
    }

    #[rstest]
    fn test_insert_into_empty_creates_leaf() {
        let (root, inserted) = insert::<i32, String, Unbalanced>(None, 5, None);
        assert!(inserted);
        assert!(root.is_leaf());
        assert_eq!(root.height(), 1);
    }

    #[rstest]
    fn test_insert_duplicate_keeps_existing_value() {
        let link = build::<Unbalanced>(&[2, 1, 3]);
        let (root, inserted) = insert::<_, _, Unbalanced>(link, 3, Some("other".to_string()));
        assert!(!inserted);
        assert_eq!(
            find(Some(&*root), &3).and_then(OrderedNode::value),
            Some(&"v3".to_string())
        );
    }

    #[rstest]
    fn test_plain_insert_sorted_keys_forms_chain() {
        let link = build::<Unbalanced>(&[1, 2, 3, 4, 5]);
        assert_eq!(link.as_ref().map(|root| root.height()), Some(5));
        assert_eq!(keys_of(&link), vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_avl_insert_sorted_keys_stays_shallow() {
        let link = build::<AvlBalancer>(&[1, 2, 3, 4, 5]);
        assert_eq!(link.as_ref().map(|root| root.height()), Some(3));
    }

    #[rstest]
    #[case(&[], 1, false)]
    #[case(&[5, 3, 8], 3, true)]
    #[case(&[5, 3, 8], 4, false)]
    fn test_find(#[case] keys: &[i32], #[case] target: i32, #[case] expected: bool) {
        let link = build::<Unbalanced>(keys);
        assert_eq!(find(link.as_deref(), &target).is_some(), expected);
    }

    #[rstest]
    fn test_find_mut_updates_value_in_place() {
        let mut link = build::<AvlBalancer>(&[2, 1, 3]);
        if let Some(slot) = find_mut(link.as_deref_mut(), &1) {
            *slot = Some("updated".to_string());
        }
        assert_eq!(
            find(link.as_deref(), &1).and_then(OrderedNode::value),
            Some(&"updated".to_string())
        );
    }

    #[rstest]
    fn test_min_and_max() {
        let link = build::<Unbalanced>(&[5, 3, 8, 1, 9]);
        assert_eq!(min(link.as_deref()).map(OrderedNode::key), Some(&1));
        assert_eq!(max(link.as_deref()).map(OrderedNode::key), Some(&9));
        assert!(min::<i32, String>(None).is_none());
    }

    #[rstest]
    fn test_remove_leaf() {
        let link = build::<Unbalanced>(&[5, 3, 8]);
        let (link, removed) = remove::<_, _, _, Unbalanced>(link, &3);
        assert_eq!(removed, Some((3, Some("v3".to_string()))));
        assert_eq!(keys_of(&link), vec![5, 8]);
    }

    #[rstest]
    fn test_remove_node_with_one_child() {
        let link = build::<Unbalanced>(&[5, 3, 1]);
        let (link, removed) = remove::<_, _, _, Unbalanced>(link, &3);
        assert_eq!(removed.map(|(key, _)| key), Some(3));
        assert_eq!(keys_of(&link), vec![1, 5]);
        assert_eq!(link.as_ref().map(|root| root.height()), Some(2));
    }

    #[rstest]
    fn test_remove_two_children_takes_successor_entry() {
        let link = build::<Unbalanced>(&[5, 3, 8, 7, 9]);
        let (link, removed) = remove::<_, _, _, Unbalanced>(link, &5);

        assert_eq!(removed, Some((5, Some("v5".to_string()))));
        let root = link.as_deref().map(|root| (root.key, root.value.clone()));
        assert_eq!(root, Some((7, Some("v7".to_string()))));
        assert_eq!(keys_of(&link), vec![3, 7, 8, 9]);
    }

    #[rstest]
    fn test_remove_missing_key_leaves_tree_unchanged() {
        let link = build::<AvlBalancer>(&[5, 3, 8]);
        let (link, removed) = remove::<_, _, _, AvlBalancer>(link, &4);
        assert!(removed.is_none());
        assert_eq!(keys_of(&link), vec![3, 5, 8]);
    }

    #[rstest]
    fn test_remove_from_empty() {
        let (link, removed) = remove::<i32, String, i32, AvlBalancer>(None, &1);
        assert!(link.is_none());
        assert!(removed.is_none());
    }

    #[rstest]
    fn test_remove_min_and_max() {
        let link = build::<AvlBalancer>(&[4, 2, 6, 1, 3, 5, 7]);
        let root = link.expect("tree is not empty");
        let (link, minimum) = remove_min::<_, _, AvlBalancer>(root);
        assert_eq!(minimum.0, 1);

        let root = link.expect("tree is not empty");
        let (link, maximum) = remove_max::<_, _, AvlBalancer>(root);
        assert_eq!(maximum.0, 7);
        assert_eq!(keys_of(&link), vec![2, 3, 4, 5, 6]);
    }

    #[rstest]
    fn test_avl_remove_rebalances() {
        // Removing 1 leaves 2 with a right subtree of height 2.
        let link = build::<AvlBalancer>(&[2, 1, 3, 4]);
        let (link, _) = remove::<_, _, _, AvlBalancer>(link, &1);
        let root = link.expect("tree is not empty");
        assert_eq!(root.key, 3);
        assert_eq!(root.height(), 2);
        assert_eq!(root.balance_factor(), 0);
    }

    /// Stacks `keys` bottom-up, each becoming the parent of the previous one
    /// on `side`.
    fn stack(keys: impl Iterator<Item = u32>, side: Side) -> Link<u32, ()> {
        keys.fold(None, |below, key| {
            let mut node = Box::new(OrderedNode::leaf(key, None));
            node.height = height_of(below.as_deref()) + 1;
            *slot(&mut node, side) = below;
            Some(node)
        })
    }

    #[rstest]
    fn test_plain_mutations_walk_deep_chain_without_recursion() {
        const DEPTH: u32 = 100_000;
        let depth = DEPTH as usize;
        let chain = stack((0..DEPTH).rev(), Side::Right);

        let (root, inserted) = insert::<_, _, Unbalanced>(chain, DEPTH, None);
        assert!(inserted);
        assert_eq!(root.height(), depth + 1);

        let (root, inserted) = insert::<_, _, Unbalanced>(Some(root), DEPTH, None);
        assert!(!inserted);

        let (link, removed) = remove::<_, _, _, Unbalanced>(Some(root), &(DEPTH / 2));
        assert_eq!(removed, Some((DEPTH / 2, None)));
        assert_eq!(height_of(link.as_deref()), depth);

        let (link, missing) = remove::<_, _, _, Unbalanced>(link, &(DEPTH / 2));
        assert!(missing.is_none());
        assert!(find(link.as_deref(), &(DEPTH / 2)).is_none());

        let root = link.expect("chain is not empty");
        let (link, maximum) = remove_max::<_, _, Unbalanced>(root);
        assert_eq!(maximum.0, DEPTH);
        assert_eq!(
            max(link.as_deref()).map(OrderedNode::key),
            Some(&(DEPTH - 1))
        );
        assert_eq!(height_of(link.as_deref()), depth - 1);

        dismantle(link);
    }

    #[rstest]
    fn test_two_child_removal_finds_successor_at_bottom_of_deep_chain() {
        const DEPTH: u32 = 100_000;
        let mut root = Box::new(OrderedNode::leaf(1, None));
        root.left = Some(Box::new(OrderedNode::leaf(0, None)));
        root.right = stack(2..=DEPTH, Side::Left);
        root.update_height();

        let (link, removed) = remove::<_, _, _, Unbalanced>(Some(root), &1);
        assert_eq!(removed, Some((1, None)));

        let root = link.expect("tree is not empty");
        assert_eq!(root.key, 2);
        assert_eq!(min(root.right()).map(OrderedNode::key), Some(&3));
        assert_eq!(root.height(), DEPTH as usize - 1);

        dismantle(Some(root));
    }
}
