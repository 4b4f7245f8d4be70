//! The node type shared by every tree operation.
//!
//! Each [`OrderedNode`] exclusively owns its children through [`Link`]s.
//! There are no parent pointers: the way back up is the path the search
//! engine keeps while descending.

/// An owned, possibly absent subtree.
pub type Link<K, V> = Option<Box<OrderedNode<K, V>>>;

// =============================================================================
// Node Definition
// =============================================================================

/// A single entry of an ordered tree together with its subtrees.
///
/// The key never changes while the node is reachable from a tree, except
/// when a removal moves a successor's entry into it. The value may be
/// absent for key-only insertions.
///
/// # Invariants
///
/// - every key in `left` is less than `key`, every key in `right` is greater
/// - `height == 1 + max(height(left), height(right))`, with an absent
///   subtree having height 0
pub struct OrderedNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) height: usize,
}

impl<K, V> OrderedNode<K, V> {
    /// Creates a leaf.
    pub(crate) const fn leaf(key: K, value: Option<V>) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Returns the key stored in this node.
    #[inline]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value stored in this node, if any.
    #[inline]
    pub const fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Returns the left subtree.
    #[inline]
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// Returns the right subtree.
    #[inline]
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Returns the cached height of the subtree rooted here (a leaf is 1).
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if this node has no children.
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the left height minus the right height.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{Balancing, OrderedTree};
    ///
    /// let tree: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Plain, [1, 2, 3]);
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.balance_factor(), -2);
    /// ```
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub fn balance_factor(&self) -> isize {
        height_of(self.left.as_deref()) as isize - height_of(self.right.as_deref()) as isize
    }

    /// Height this node should have according to its children.
    #[inline]
    pub(crate) fn computed_height(&self) -> usize {
        1 + height_of(self.left.as_deref()).max(height_of(self.right.as_deref()))
    }

    /// Recomputes the cached height from the children's cached heights.
    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = self.computed_height();
    }

    /// Consumes a detached node, yielding its entry.
    ///
    /// Children still attached are torn down iteratively.
    pub(crate) fn into_entry(mut self: Box<Self>) -> (K, Option<V>) {
        dismantle(self.left.take());
        dismantle(self.right.take());
        let Self { key, value, .. } = *self;
        (key, value)
    }
}

impl<K: Clone, V: Clone> Clone for OrderedNode<K, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            left: clone_link(&self.left),
            right: clone_link(&self.right),
            height: self.height,
        }
    }
}

/// Copies a subtree bottom-up with an explicit stack.
fn clone_link<K: Clone, V: Clone>(root: &Link<K, V>) -> Link<K, V> {
    let mut pending: Vec<(&OrderedNode<K, V>, bool)> =
        root.as_deref().map(|node| (node, false)).into_iter().collect();
    // Finished copies; a parent's children are the topmost entries.
    let mut copies: Vec<Box<OrderedNode<K, V>>> = Vec::new();

    while let Some((node, expanded)) = pending.pop() {
        if expanded {
            let right = node.right.as_ref().and_then(|_| copies.pop());
            let left = node.left.as_ref().and_then(|_| copies.pop());
            copies.push(Box::new(OrderedNode {
                key: node.key.clone(),
                value: node.value.clone(),
                left,
                right,
                height: node.height,
            }));
        } else {
            pending.push((node, true));
            pending.extend(node.right.as_deref().map(|right| (right, false)));
            pending.extend(node.left.as_deref().map(|left| (left, false)));
        }
    }

    copies.pop()
}

/// Height of a possibly absent subtree.
#[inline]
pub fn height_of<K, V>(node: Option<&OrderedNode<K, V>>) -> usize {
    node.map_or(0, OrderedNode::height)
}

/// Drops a subtree without recursing.
///
/// A plain tree built from sorted keys is a chain as deep as it is long;
/// the compiler-generated drop would recurse once per node.
pub(crate) fn dismantle<K, V>(root: Link<K, V>) {
    let mut pending: Vec<Box<OrderedNode<K, V>>> = root.into_iter().collect();
    while let Some(mut node) = pending.pop() {
        pending.extend(node.left.take());
        pending.extend(node.right.take());
    }
}

// =============================================================================
// Tests
// =============================================================================
