//! Structural diagnostics for [`OrderedTree`].
//!
//! Everything here is recomputed from the actual shape of the tree rather
//! than trusted from the cached heights, so these checks also catch a stale
//! cache. All walks are iterative.

use std::collections::VecDeque;
use std::fmt;

use super::error::InvariantViolation;
use super::node::OrderedNode;
use super::ordered_tree::{Balancing, OrderedTree};
use super::traversal::{Traversal, TraversalOrder, traverse};

/// Indentation added per level by [`TreeLayout::Sideways`].
const SIDEWAYS_INDENT: &str = "    ";

/// How [`OrderedTree::render`] lays the tree out as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeLayout {
    /// The tree rotated a quarter turn counter-clockwise: one key per line,
    /// indented by depth, right subtree above its parent.
    #[default]
    Sideways,
    /// One line per depth, keys separated by spaces, left to right.
    Levels,
}

// =============================================================================
// Shape Walks
// =============================================================================

/// Walks the subtree bottom-up, handing each node the real heights of its
/// subtrees.
///
/// Stops early and returns `None` as soon as `visit` returns `false`;
/// otherwise returns the real height of `root`.
fn fold_heights<K, V, F>(root: Option<&OrderedNode<K, V>>, mut visit: F) -> Option<usize>
where
    F: FnMut(&OrderedNode<K, V>, usize, usize) -> bool,
{
    let mut stack: Vec<(&OrderedNode<K, V>, bool)> =
        root.map(|node| (node, false)).into_iter().collect();
    let mut heights: Vec<usize> = Vec::new();

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            let right = node.right.as_ref().and_then(|_| heights.pop()).unwrap_or(0);
            let left = node.left.as_ref().and_then(|_| heights.pop()).unwrap_or(0);
            if !visit(node, left, right) {
                return None;
            }
            heights.push(1 + left.max(right));
        } else {
            stack.push((node, true));
            stack.extend(node.right.as_deref().map(|right| (right, false)));
            stack.extend(node.left.as_deref().map(|left| (left, false)));
        }
    }

    Some(heights.pop().unwrap_or(0))
}

/// Every node of the subtree, in pre-order.
fn nodes<K, V>(root: Option<&OrderedNode<K, V>>) -> impl Iterator<Item = &OrderedNode<K, V>> {
    let mut stack: Vec<&OrderedNode<K, V>> = root.into_iter().collect();
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        stack.extend(node.right.as_deref());
        stack.extend(node.left.as_deref());
        Some(node)
    })
}

fn real_height<K, V>(root: Option<&OrderedNode<K, V>>) -> usize {
    fold_heights(root, |_, _, _| true).unwrap_or(0)
}

fn is_balanced<K, V>(root: Option<&OrderedNode<K, V>>) -> bool {
    fold_heights(root, |_, left, right| left.abs_diff(right) <= 1).is_some()
}

fn is_full<K, V>(root: Option<&OrderedNode<K, V>>) -> bool {
    nodes(root).all(|node| node.left.is_some() == node.right.is_some())
}

/// Breadth-first, a present node may not follow an absent slot.
fn is_complete<K, V>(root: Option<&OrderedNode<K, V>>) -> bool {
    let mut queue: VecDeque<Option<&OrderedNode<K, V>>> = VecDeque::from([root]);
    let mut gap_seen = false;

    while let Some(slot) = queue.pop_front() {
        match slot {
            Some(node) => {
                if gap_seen {
                    return false;
                }
                queue.push_back(node.left.as_deref());
                queue.push_back(node.right.as_deref());
            }
            None => gap_seen = true,
        }
    }

    true
}

fn is_perfect<K, V>(root: Option<&OrderedNode<K, V>>) -> bool {
    let height = real_height(root);
    let count = nodes(root).count();
    u32::try_from(height)
        .ok()
        .and_then(|height| 1_usize.checked_shl(height))
        .is_some_and(|capacity| count == capacity - 1)
}

fn check_heights<K, V>(root: Option<&OrderedNode<K, V>>) -> Result<(), InvariantViolation> {
    let mut violation = None;
    fold_heights(root, |node, left, right| {
        let expected = 1 + left.max(right);
        if node.height == expected {
            true
        } else {
            violation = Some(InvariantViolation::HeightMismatch {
                expected,
                cached: node.height,
            });
            false
        }
    });
    violation.map_or(Ok(()), Err)
}

fn check_order<K: Ord, V>(root: Option<&OrderedNode<K, V>>) -> Result<(), InvariantViolation> {
    let mut previous: Option<&K> = None;
    for (key, _) in traverse(root, TraversalOrder::InOrder) {
        if previous.is_some_and(|previous| previous >= key) {
            return Err(InvariantViolation::OrderViolated);
        }
        previous = Some(key);
    }
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
fn check_balance<K, V>(root: Option<&OrderedNode<K, V>>) -> Result<(), InvariantViolation> {
    let mut violation = None;
    fold_heights(root, |_, left, right| {
        let balance_factor = left as isize - right as isize;
        if (-1..=1).contains(&balance_factor) {
            true
        } else {
            violation = Some(InvariantViolation::Unbalanced { balance_factor });
            false
        }
    });
    violation.map_or(Ok(()), Err)
}

/// Reverse in-order picture: one key per line, indented by depth.
struct Sideways<'a, K, V>(Option<&'a OrderedNode<K, V>>);

impl<K: fmt::Display, V> fmt::Display for Sideways<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(&OrderedNode<K, V>, usize)> = Vec::new();
        let mut current = self.0.map(|node| (node, 0));
        let mut first = true;

        // Right subtree, node, left subtree.
        loop {
            while let Some((node, depth)) = current {
                stack.push((node, depth));
                current = node.right.as_deref().map(|right| (right, depth + 1));
            }
            let Some((node, depth)) = stack.pop() else {
                return Ok(());
            };
            if !first {
                formatter.write_str("\n")?;
            }
            first = false;
            for _ in 0..depth {
                formatter.write_str(SIDEWAYS_INDENT)?;
            }
            write!(formatter, "{}", node.key)?;
            current = node.left.as_deref().map(|left| (left, depth + 1));
        }
    }
}

/// Breadth-first picture: one line per depth, keys separated by spaces.
struct Levels<'a, K, V>(Option<&'a OrderedNode<K, V>>);

impl<K: fmt::Display, V> fmt::Display for Levels<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut queue: VecDeque<(&OrderedNode<K, V>, usize)> =
            self.0.map(|node| (node, 0)).into_iter().collect();
        let mut previous: Option<usize> = None;

        while let Some((node, depth)) = queue.pop_front() {
            match previous {
                Some(level) if level == depth => formatter.write_str(" ")?,
                Some(_) => formatter.write_str("\n")?,
                None => {}
            }
            previous = Some(depth);
            write!(formatter, "{}", node.key)?;
            queue.extend(node.left.as_deref().map(|left| (left, depth + 1)));
            queue.extend(node.right.as_deref().map(|right| (right, depth + 1)));
        }

        Ok(())
    }
}

/// Bracketed values in traversal order; key-only entries print as `-`.
struct ValueSequence<'a, K, V>(Traversal<'a, K, V>);

impl<K, V: fmt::Display> fmt::Display for ValueSequence<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        for (index, (_, value)) in self.0.clone().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            match value {
                Some(value) => write!(formatter, "{value}")?,
                None => formatter.write_str("-")?,
            }
        }
        formatter.write_str("]")
    }
}

// =============================================================================
// OrderedTree Diagnostics
// =============================================================================

impl<K, V> OrderedTree<K, V> {
    /// Returns `true` if at every node the subtree heights differ by at most
    /// one. An AVL tree always is; a plain tree may be by chance.
    pub fn is_balanced(&self) -> bool {
        is_balanced(self.root())
    }

    /// Returns `true` if every node has either zero or two children.
    pub fn is_full(&self) -> bool {
        is_full(self.root())
    }

    /// Returns `true` if every level except possibly the last is filled and
    /// the last level is filled from the left.
    pub fn is_complete(&self) -> bool {
        is_complete(self.root())
    }

    /// Returns `true` if every level is completely filled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{Balancing, OrderedTree};
    ///
    /// let mut tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Avl, [2, 1, 3]);
    /// assert!(tree.is_perfect());
    /// tree.insert_key(0);
    /// assert!(!tree.is_perfect());
    /// assert!(tree.is_complete());
    /// ```
    pub fn is_perfect(&self) -> bool {
        is_perfect(self.root())
    }

    /// Lays the keys out as a multi-line picture of the tree.
    ///
    /// An empty tree renders as an empty string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{Balancing, OrderedTree, TreeLayout};
    ///
    /// let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Avl, [2, 1, 3]);
    /// assert_eq!(tree.render(TreeLayout::Sideways), "    3\n2\n    1");
    /// assert_eq!(tree.render(TreeLayout::Levels), "2\n1 3");
    /// ```
    pub fn render(&self, layout: TreeLayout) -> String
    where
        K: fmt::Display,
    {
        match layout {
            TreeLayout::Sideways => Sideways(self.root()).to_string(),
            TreeLayout::Levels => Levels(self.root()).to_string(),
        }
    }

    /// Collects the mode, size, height, shape predicates, the keys and values
    /// in all four orders, and a sideways picture into one printable summary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{Balancing, OrderedTree};
    ///
    /// let mut tree = OrderedTree::from_entries(Balancing::Avl, [(2, 'b'), (1, 'a')]);
    /// tree.insert_key(3);
    /// let report = tree.report();
    /// assert_eq!(report.values[0].1, "[a, b, -]");
    /// assert_eq!(report.picture, "    3\n2\n    1");
    /// ```
    pub fn report(&self) -> TreeReport
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        TreeReport {
            balancing: self.balancing(),
            size: self.len(),
            height: self.height(),
            balanced: self.is_balanced(),
            full: self.is_full(),
            complete: self.is_complete(),
            perfect: self.is_perfect(),
            orders: TraversalOrder::ALL.map(|order| (order, self.to_string_with(order))),
            values: TraversalOrder::ALL
                .map(|order| (order, ValueSequence(self.traverse(order)).to_string())),
            picture: Sideways(self.root()).to_string(),
        }
    }
}

impl<K: Ord, V> OrderedTree<K, V> {
    /// Verifies the structural invariants against the real shape.
    ///
    /// Checks, in this order, that every cached height is correct, that the
    /// in-order keys strictly ascend, and, for [`Balancing::Avl`], that every
    /// balance factor lies in `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let root = self.root();
        check_heights(root)?;
        check_order(root)?;
        if self.balancing() == Balancing::Avl {
            check_balance(root)?;
        }
        Ok(())
    }
}

// =============================================================================
// TreeReport
// =============================================================================

/// Snapshot of a tree's shape, printed one fact per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeReport {
    /// Balancing mode of the tree.
    pub balancing: Balancing,
    /// Number of entries.
    pub size: usize,
    /// Number of levels.
    pub height: usize,
    /// Result of [`OrderedTree::is_balanced`].
    pub balanced: bool,
    /// Result of [`OrderedTree::is_full`].
    pub full: bool,
    /// Result of [`OrderedTree::is_complete`].
    pub complete: bool,
    /// Result of [`OrderedTree::is_perfect`].
    pub perfect: bool,
    /// Formatted keys for each traversal order.
    pub orders: [(TraversalOrder, String); 4],
    /// Formatted values for each traversal order, `-` for key-only entries.
    pub values: [(TraversalOrder, String); 4],
    /// The tree as drawn by [`TreeLayout::Sideways`].
    pub picture: String,
}

impl fmt::Display for TreeReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "OrderedTree ({})", self.balancing)?;
        writeln!(formatter, "Size: {}", self.size)?;
        writeln!(formatter, "Height: {}", self.height)?;
        writeln!(formatter, "Balanced: {}", self.balanced)?;
        writeln!(formatter, "Full: {}", self.full)?;
        writeln!(formatter, "Complete: {}", self.complete)?;
        write!(formatter, "Perfect: {}", self.perfect)?;
        for (order, keys) in &self.orders {
            write!(formatter, "\nKeys, {order}: {keys}")?;
        }
        for (order, values) in &self.values {
            write!(formatter, "\nValues, {order}: {values}")?;
        }
        write!(formatter, "\nTree:")?;
        if !self.picture.is_empty() {
            write!(formatter, "\n{}", self.picture)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
