//! Deterministic linearisations of a subtree.
//!
//! [`Traversal`] is a lazy iterator over `(&K, Option<&V>)` pairs in one of
//! the four [`TraversalOrder`]s. None of the orders recurse: the depth-first
//! orders keep an explicit stack (inline for trees up to
//! [`STACK_INLINE_CAPACITY`] levels) and level order keeps a FIFO queue.
//!
//! A traversal is restartable: cloning it yields an independent cursor at the
//! same position, and asking the tree for a new one always starts over.
//!
//! # Examples
//!
//! ```rust
//! use arbor::tree::{OrderedTree, TraversalOrder};
//!
//! let tree: OrderedTree<i32, ()> = [2, 1, 3].into_iter().map(|key| (key, ())).collect();
//!
//! let keys = |order| tree.traverse(order).map(|(key, _)| *key).collect::<Vec<_>>();
//! assert_eq!(keys(TraversalOrder::InOrder), vec![1, 2, 3]);
//! assert_eq!(keys(TraversalOrder::PreOrder), vec![2, 1, 3]);
//! assert_eq!(keys(TraversalOrder::PostOrder), vec![1, 3, 2]);
//! assert_eq!(keys(TraversalOrder::LevelOrder), vec![2, 1, 3]);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use smallvec::SmallVec;

use super::error::TreeError;
use super::node::{Link, OrderedNode, dismantle};

/// Number of stack frames a depth-first traversal keeps inline.
///
/// An AVL tree needs more than 32 levels only beyond three million entries.
pub const STACK_INLINE_CAPACITY: usize = 32;

type NodeStack<'a, K, V> = SmallVec<[&'a OrderedNode<K, V>; STACK_INLINE_CAPACITY]>;

// =============================================================================
// TraversalOrder
// =============================================================================

/// Selects the sequence in which a traversal visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalOrder {
    /// Left subtree, node, right subtree: ascending key order.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree. Re-inserting the keys in this order
    /// into an empty plain tree rebuilds the same shape.
    PreOrder,
    /// Left subtree, right subtree, node: children before their parent.
    PostOrder,
    /// Breadth first, each level left to right.
    LevelOrder,
}

impl TraversalOrder {
    /// Every order, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::InOrder,
        Self::PreOrder,
        Self::PostOrder,
        Self::LevelOrder,
    ];

    /// Returns the canonical name, such as `"in-order"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::InOrder => "in-order",
            Self::PreOrder => "pre-order",
            Self::PostOrder => "post-order",
            Self::LevelOrder => "level-order",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for TraversalOrder {
    type Err = TreeError;

    /// Parses a canonical name; `_`, spaces and a missing hyphen are accepted.
    ///
    /// ```rust
    /// use arbor::tree::TraversalOrder;
    ///
    /// assert_eq!("level_order".parse::<TraversalOrder>(), Ok(TraversalOrder::LevelOrder));
    /// assert!("sideways".parse::<TraversalOrder>().is_err());
    /// ```
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|character| !matches!(character, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "inorder" => Ok(Self::InOrder),
            "preorder" => Ok(Self::PreOrder),
            "postorder" => Ok(Self::PostOrder),
            "levelorder" => Ok(Self::LevelOrder),
            _ => Err(TreeError::UnknownOrder(name.to_string())),
        }
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// Starts a traversal of the subtree rooted at `root`.
///
/// An absent root yields an empty sequence.
pub fn traverse<K, V>(
    root: Option<&OrderedNode<K, V>>,
    order: TraversalOrder,
) -> Traversal<'_, K, V> {
    let state = match order {
        TraversalOrder::InOrder => State::InOrder {
            stack: SmallVec::new(),
            current: root,
        },
        TraversalOrder::PreOrder => State::PreOrder {
            stack: root.into_iter().collect(),
        },
        TraversalOrder::PostOrder => State::PostOrder {
            stack: root.map(|node| (node, false)).into_iter().collect(),
        },
        TraversalOrder::LevelOrder => State::LevelOrder {
            queue: root.into_iter().collect(),
        },
    };
    Traversal { order, state }
}

/// A lazy iterator over the entries of a subtree in a fixed order.
pub struct Traversal<'a, K, V> {
    order: TraversalOrder,
    state: State<'a, K, V>,
}

enum State<'a, K, V> {
    InOrder {
        stack: NodeStack<'a, K, V>,
        current: Option<&'a OrderedNode<K, V>>,
    },
    PreOrder {
        stack: NodeStack<'a, K, V>,
    },
    PostOrder {
        // The flag records whether the node's children were already pushed.
        stack: SmallVec<[(&'a OrderedNode<K, V>, bool); STACK_INLINE_CAPACITY]>,
    },
    LevelOrder {
        queue: VecDeque<&'a OrderedNode<K, V>>,
    },
}

impl<K, V> Traversal<'_, K, V> {
    /// Returns the order this traversal follows.
    pub const fn order(&self) -> TraversalOrder {
        self.order
    }
}

#[inline]
fn entry<K, V>(node: &OrderedNode<K, V>) -> (&K, Option<&V>) {
    (&node.key, node.value.as_ref())
}

impl<'a, K, V> Iterator for Traversal<'a, K, V> {
    type Item = (&'a K, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::InOrder { stack, current } => {
                while let Some(node) = *current {
                    stack.push(node);
                    *current = node.left.as_deref();
                }
                let node = stack.pop()?;
                *current = node.right.as_deref();
                Some(entry(node))
            }
            State::PreOrder { stack } => {
                let node = stack.pop()?;
                stack.extend(node.right.as_deref());
                stack.extend(node.left.as_deref());
                Some(entry(node))
            }
            State::PostOrder { stack } => loop {
                let (node, expanded) = stack.pop()?;
                if expanded {
                    return Some(entry(node));
                }
                stack.push((node, true));
                stack.extend(node.right.as_deref().map(|right| (right, false)));
                stack.extend(node.left.as_deref().map(|left| (left, false)));
            },
            State::LevelOrder { queue } => {
                let node = queue.pop_front()?;
                queue.extend(node.left.as_deref());
                queue.extend(node.right.as_deref());
                Some(entry(node))
            }
        }
    }
}

impl<K, V> FusedIterator for Traversal<'_, K, V> {}

impl<K, V> Clone for Traversal<'_, K, V> {
    fn clone(&self) -> Self {
        let state = match &self.state {
            State::InOrder { stack, current } => State::InOrder {
                stack: stack.clone(),
                current: *current,
            },
            State::PreOrder { stack } => State::PreOrder {
                stack: stack.clone(),
            },
            State::PostOrder { stack } => State::PostOrder {
                stack: stack.clone(),
            },
            State::LevelOrder { queue } => State::LevelOrder {
                queue: queue.clone(),
            },
        };
        Self {
            order: self.order,
            state,
        }
    }
}

impl<K, V> fmt::Debug for Traversal<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Traversal")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning in-order iterator over the entries of an
/// [`OrderedTree`](super::OrderedTree).
pub struct IntoIter<K, V> {
    stack: Vec<Box<OrderedNode<K, V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Link<K, V>, length: usize) -> Self {
        let mut iterator = Self {
            stack: Vec::new(),
            remaining: length,
        };
        iterator.descend_left(root);
        iterator
    }

    fn descend_left(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, Option<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.descend_left(node.right.take());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.into_entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> Drop for IntoIter<K, V> {
    fn drop(&mut self) {
        for node in self.stack.drain(..) {
            dismantle(Some(node));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
