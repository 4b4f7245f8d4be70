//! Ordered-key trees: a plain binary search tree and an AVL tree behind one
//! façade.
//!
//! - [`OrderedTree`]: the owning map from unique keys to optional values
//! - [`search`]: the policy-parameterized insert, lookup, and removal engine
//! - [`BalancePolicy`]: the seam between the engine and the balancing rules,
//!   implemented by [`Unbalanced`] and [`AvlBalancer`]
//! - [`Traversal`]: lazy, restartable in-, pre-, post-, and level-order walks
//!
//! # Balancing Modes
//!
//! The mode is chosen once, at construction. Both modes share the same node
//! type, the same search engine, and the same cached heights; they differ
//! only in what happens on the way back up from a mutation.
//!
//! ```rust
//! use arbor::tree::{Balancing, OrderedTree};
//!
//! let plain: OrderedTree<u32, ()> = OrderedTree::from_keys(Balancing::Plain, 1..=7);
//! let avl: OrderedTree<u32, ()> = OrderedTree::from_keys(Balancing::Avl, 1..=7);
//!
//! // Same entries, different shapes.
//! assert_eq!(plain, avl);
//! assert_eq!(plain.height(), 7);
//! assert_eq!(avl.height(), 3);
//! ```
//!
//! # Traversal Orders
//!
//! ```rust
//! use arbor::tree::{OrderedTree, TraversalOrder};
//!
//! let keys = [5, 3, 8, 1, 4, 7, 9];
//! let tree: OrderedTree<i32, ()> = keys.into_iter().map(|key| (key, ())).collect();
//!
//! assert_eq!(tree.to_string_with(TraversalOrder::InOrder), "[1, 3, 4, 5, 7, 8, 9]");
//! assert_eq!(tree.to_string_with(TraversalOrder::PreOrder), "[5, 3, 1, 4, 8, 7, 9]");
//! assert_eq!(tree.to_string_with(TraversalOrder::PostOrder), "[1, 4, 3, 7, 9, 8, 5]");
//! assert_eq!(tree.to_string_with(TraversalOrder::LevelOrder), "[5, 3, 8, 1, 4, 7, 9]");
//! ```

mod avl;
mod error;
mod node;
mod ordered_tree;
pub mod search;
#[cfg(feature = "diagnostics")]
mod shape;
mod traversal;

pub use avl::{AvlBalancer, BalancePolicy, Unbalanced, rotate_left, rotate_right};
pub use error::{InvariantViolation, TreeError};
pub use node::{Link, OrderedNode, height_of};
pub use ordered_tree::{Balancing, OrderedTree};
pub use search::Entry;
#[cfg(feature = "diagnostics")]
pub use shape::{TreeLayout, TreeReport};
pub use traversal::{IntoIter, STACK_INLINE_CAPACITY, Traversal, TraversalOrder, traverse};
