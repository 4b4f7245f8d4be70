//! The public ordered-key tree.
//!
//! [`OrderedTree`] owns the root and the entry count and routes every
//! operation to the search engine with the balancing policy chosen at
//! construction.

use std::borrow::Borrow;
use std::fmt;
use std::mem;

use super::avl::{AvlBalancer, Unbalanced};
use super::error::TreeError;
use super::node::{Link, OrderedNode, dismantle};
use super::search;
use super::traversal::{IntoIter, Traversal, TraversalOrder, traverse};

// =============================================================================
// Balancing
// =============================================================================

/// Balancing mode of an [`OrderedTree`], fixed for the tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Balancing {
    /// Plain binary search tree: the shape follows the insertion order.
    Plain,
    /// AVL tree: subtree heights differ by at most one at every node.
    #[default]
    Avl,
}

impl fmt::Display for Balancing {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => formatter.write_str("plain"),
            Self::Avl => formatter.write_str("avl"),
        }
    }
}

// =============================================================================
// OrderedTree Definition
// =============================================================================

/// An ordered map from unique keys to optional values.
///
/// Keys must implement `Ord`. Each key is stored at most once: inserting a
/// key that is already present is rejected and leaves the tree unchanged.
/// Values are optional so a tree can also be used as an ordered key set.
///
/// # Time Complexity
///
/// | Operation          | [`Balancing::Avl`] | [`Balancing::Plain`] |
/// |--------------------|--------------------|----------------------|
/// | `insert`           | O(log N)           | O(N) worst case      |
/// | `get` / `contains` | O(log N)           | O(N) worst case      |
/// | `remove`           | O(log N)           | O(N) worst case      |
/// | `len` / `height`   | O(1)               | O(1)                 |
/// | `traverse`         | O(N)               | O(N)                 |
///
/// No operation recurses, so a plain tree fed long runs of sorted keys gets
/// slow but never exhausts the call stack.
///
/// # Examples
///
/// ```rust
/// use arbor::tree::{OrderedTree, TraversalOrder};
///
/// let mut tree = OrderedTree::avl();
/// for key in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(key, key * 100);
/// }
///
/// assert_eq!(tree.len(), 7);
/// assert_eq!(tree.height(), 3);
/// assert_eq!(tree.get(&4), Ok(Some(&400)));
/// assert_eq!(tree.to_string_with(TraversalOrder::LevelOrder), "[5, 3, 8, 1, 4, 7, 9]");
///
/// assert_eq!(tree.remove(&5), Ok(Some(500)));
/// assert_eq!(tree.to_string(), "[1, 3, 4, 7, 8, 9]");
/// ```
#[derive(Clone)]
pub struct OrderedTree<K, V> {
    root: Link<K, V>,
    length: usize,
    balancing: Balancing,
}

static_assertions::assert_impl_all!(OrderedTree<i32, String>: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(OrderedTree<i32, String>: Copy);

impl<K, V> OrderedTree<K, V> {
    /// Creates an empty tree with the given balancing mode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{Balancing, OrderedTree};
    ///
    /// let tree: OrderedTree<i32, String> = OrderedTree::new(Balancing::Plain);
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.balancing(), Balancing::Plain);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(balancing: Balancing) -> Self {
        Self {
            root: None,
            length: 0,
            balancing,
        }
    }

    /// Creates an empty plain binary search tree.
    #[inline]
    #[must_use]
    pub const fn plain() -> Self {
        Self::new(Balancing::Plain)
    }

    /// Creates an empty AVL tree.
    #[inline]
    #[must_use]
    pub const fn avl() -> Self {
        Self::new(Balancing::Avl)
    }

    /// Returns the balancing mode chosen at construction.
    #[inline]
    pub const fn balancing(&self) -> Balancing {
        self.balancing
    }

    /// Returns the number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns the number of entries; an alias of [`len`](Self::len).
    #[inline]
    pub const fn size(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree has no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of levels, 0 for an empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{Balancing, OrderedTree};
    ///
    /// let plain: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Plain, 1..=5);
    /// let avl: OrderedTree<i32, ()> = OrderedTree::from_keys(Balancing::Avl, 1..=5);
    /// assert_eq!(plain.height(), 5);
    /// assert_eq!(avl.height(), 3);
    /// ```
    #[inline]
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    /// Returns the root node for read-only inspection.
    #[inline]
    pub fn root(&self) -> Option<&OrderedNode<K, V>> {
        self.root.as_deref()
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty.
    pub fn min(&self) -> Result<(&K, Option<&V>), TreeError> {
        search::min(self.root.as_deref())
            .map(|node| (node.key(), node.value()))
            .ok_or(TreeError::EmptyStructure)
    }

    /// Returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty.
    pub fn max(&self) -> Result<(&K, Option<&V>), TreeError> {
        search::max(self.root.as_deref())
            .map(|node| (node.key(), node.value()))
            .ok_or(TreeError::EmptyStructure)
    }

    /// Returns a lazy traversal of all entries in the given order.
    #[inline]
    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_, K, V> {
        traverse(self.root.as_deref(), order)
    }

    /// Returns an iterator over entries in ascending key order.
    #[inline]
    pub fn iter(&self) -> Traversal<'_, K, V> {
        self.traverse(TraversalOrder::InOrder)
    }

    /// Returns the keys in the given order.
    pub fn keys(&self, order: TraversalOrder) -> Vec<&K> {
        self.traverse(order).map(|(key, _)| key).collect()
    }

    /// Returns the values in the given order; key-only entries yield `None`.
    pub fn values(&self, order: TraversalOrder) -> Vec<Option<&V>> {
        self.traverse(order).map(|(_, value)| value).collect()
    }

    /// Returns all entries in the given order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::{OrderedTree, TraversalOrder};
    ///
    /// let mut tree = OrderedTree::avl();
    /// tree.insert(2, 'b');
    /// tree.insert_key(1);
    ///
    /// assert_eq!(
    ///     tree.to_vec(TraversalOrder::InOrder),
    ///     vec![(&1, None), (&2, Some(&'b'))]
    /// );
    /// ```
    pub fn to_vec(&self, order: TraversalOrder) -> Vec<(&K, Option<&V>)> {
        let mut entries = Vec::with_capacity(self.length);
        entries.extend(self.traverse(order));
        entries
    }

    /// Returns the keys in the given order formatted as `[k1, k2, ...]`.
    pub fn to_string_with(&self, order: TraversalOrder) -> String
    where
        K: fmt::Display,
    {
        KeySequence(self.traverse(order)).to_string()
    }

    /// Removes every entry, keeping the balancing mode.
    pub fn clear(&mut self) {
        log::debug!("clearing {} tree of {} entries", self.balancing, self.length);
        dismantle(self.root.take());
        self.length = 0;
    }
}

impl<K: Ord, V> OrderedTree<K, V> {
    /// Builds a tree from key-value pairs, inserted in iteration order.
    ///
    /// Later duplicates of a key are ignored.
    pub fn from_entries<I>(balancing: Balancing, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Self::new(balancing);
        tree.extend(entries);
        log::debug!(
            "built {balancing} tree with {} entries and height {}",
            tree.length,
            tree.height()
        );
        tree
    }

    /// Builds a tree of key-only entries, inserted in iteration order.
    pub fn from_keys<I>(balancing: Balancing, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::new(balancing);
        for key in keys {
            tree.insert_key(key);
        }
        log::debug!(
            "built {balancing} tree with {} keys and height {}",
            tree.length,
            tree.height()
        );
        tree
    }

    /// Inserts `key` with `value`.
    ///
    /// Returns `false`, dropping `value`, if the key is already present; the
    /// stored value is not replaced. Use [`get_mut`](Self::get_mut) to
    /// update the value of an existing key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::avl();
    /// assert!(tree.insert(1, "one"));
    /// assert!(!tree.insert(1, "uno"));
    /// assert_eq!(tree.get(&1), Ok(Some(&"one")));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.insert_entry(key, Some(value))
    }

    /// Inserts `key` without a value.
    ///
    /// Returns `false` if the key is already present.
    pub fn insert_key(&mut self, key: K) -> bool {
        self.insert_entry(key, None)
    }

    /// Inserts `key` with `value`, reporting a present key as an error.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`] if the key is already present.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        if self.insert(key, value) {
            Ok(())
        } else {
            Err(TreeError::DuplicateKey)
        }
    }

    fn insert_entry(&mut self, key: K, value: Option<V>) -> bool {
        let root = self.root.take();
        let (root, inserted) = match self.balancing {
            Balancing::Plain => search::insert::<K, V, Unbalanced>(root, key, value),
            Balancing::Avl => search::insert::<K, V, AvlBalancer>(root, key, value),
        };
        self.root = Some(root);
        if inserted {
            self.length += 1;
        }
        log::trace!(
            "insert into {} tree: inserted={inserted}, len={}",
            self.balancing,
            self.length
        );
        inserted
    }

    /// Returns the value stored under `key`.
    ///
    /// The inner `Option` is `None` for a key inserted without a value.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if the key is absent, including when the tree
    /// is empty.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        search::find(self.root.as_deref(), key)
            .map(OrderedNode::value)
            .ok_or(TreeError::NotFound)
    }

    /// Returns the value slot of `key` for in-place update.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::plain();
    /// tree.insert_key("answer");
    /// *tree.get_mut("answer").unwrap() = Some(42);
    /// assert_eq!(tree.get("answer"), Ok(Some(&42)));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut Option<V>, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        search::find_mut(self.root.as_deref_mut(), key).ok_or(TreeError::NotFound)
    }

    /// Returns `true` if `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        search::find(self.root.as_deref(), key).is_some()
    }

    /// Returns `true` if `key` is present and stores a value equal to `value`.
    pub fn contains_entry<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: PartialEq,
    {
        matches!(self.get(key), Ok(Some(found)) if found == value)
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty,
    /// [`TreeError::NotFound`] if the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` and returns the stored key together with its value.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty,
    /// [`TreeError::NotFound`] if the key is absent.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, Option<V>), TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.root.is_none() {
            return Err(TreeError::EmptyStructure);
        }
        let root = self.root.take();
        let (root, removed) = match self.balancing {
            Balancing::Plain => search::remove::<K, V, Q, Unbalanced>(root, key),
            Balancing::Avl => search::remove::<K, V, Q, AvlBalancer>(root, key),
        };
        self.root = root;
        let entry = removed.ok_or(TreeError::NotFound)?;
        self.length -= 1;
        log::trace!("remove from {} tree: len={}", self.balancing, self.length);
        Ok(entry)
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty.
    pub fn pop_min(&mut self) -> Result<(K, Option<V>), TreeError> {
        let root = self.root.take().ok_or(TreeError::EmptyStructure)?;
        let (root, entry) = match self.balancing {
            Balancing::Plain => search::remove_min::<K, V, Unbalanced>(root),
            Balancing::Avl => search::remove_min::<K, V, AvlBalancer>(root),
        };
        self.root = root;
        self.length -= 1;
        Ok(entry)
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty.
    pub fn pop_max(&mut self) -> Result<(K, Option<V>), TreeError> {
        let root = self.root.take().ok_or(TreeError::EmptyStructure)?;
        let (root, entry) = match self.balancing {
            Balancing::Plain => search::remove_max::<K, V, Unbalanced>(root),
            Balancing::Avl => search::remove_max::<K, V, AvlBalancer>(root),
        };
        self.root = root;
        self.length -= 1;
        Ok(entry)
    }
}

impl<K, V: PartialEq> OrderedTree<K, V> {
    /// Returns `true` if any entry stores a value equal to `value`.
    pub fn contains_value(&self, value: &V) -> bool {
        self.key_of(value).is_some()
    }

    /// Returns the first key, in pre-order, whose value equals `value`.
    ///
    /// Values are not unique, so a different equal-valued entry may exist
    /// deeper in the tree.
    pub fn key_of(&self, value: &V) -> Option<&K> {
        self.traverse(TraversalOrder::PreOrder)
            .find_map(|(key, found)| (found == Some(value)).then_some(key))
    }
}

impl<K: Ord + Clone, V: PartialEq> OrderedTree<K, V> {
    /// Removes the entry found by [`key_of`](Self::key_of) and returns its key.
    ///
    /// This needs a full scan to locate the key before the O(depth) removal.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyStructure`] if the tree is empty,
    /// [`TreeError::NotFound`] if no entry stores `value`.
    pub fn remove_value(&mut self, value: &V) -> Result<K, TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyStructure);
        }
        let key = self.key_of(value).cloned().ok_or(TreeError::NotFound)?;
        self.remove_entry(&key).map(|(key, _)| key)
    }
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// Formats the keys of a traversal as `[k1, k2, ...]`.
struct KeySequence<'a, K, V>(Traversal<'a, K, V>);

impl<K: fmt::Display, V> fmt::Display for KeySequence<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (index, (key, _)) in self.0.clone().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new(Balancing::default())
    }
}

impl<K, V> Drop for OrderedTree<K, V> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(Balancing::default(), iter)
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for OrderedTree<K, V> {
    type Item = (K, Option<V>);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let length = mem::take(&mut self.length);
        IntoIter::new(self.root.take(), length)
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedTree<K, V> {
    type Item = (&'a K, Option<&'a V>);
    type IntoIter = Traversal<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Trees are equal when they hold the same entries, whatever their shape or
/// balancing mode.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Displays the keys in ascending order, such as `[1, 3, 4]`.
impl<K: fmt::Display, V> fmt::Display for OrderedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&KeySequence(self.iter()), formatter)
    }
}

// =============================================================================
// Tests
// =============================================================================
