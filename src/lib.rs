//! # arbor
//!
//! Ordered-key trees for Rust: a plain binary search tree and a
//! self-balancing AVL tree sharing one API.
//!
//! ## Overview
//!
//! - **Ordered map**: unique keys, optional values, O(log N) operations in
//!   AVL mode
//! - **Traversals**: lazy in-, pre-, post-, and level-order iteration
//! - **Diagnostics**: shape predicates, invariant checking, and text
//!   rendering of the tree
//!
//! ## Feature Flags
//!
//! - `diagnostics`: shape predicates, `check_invariants`, `render`, and
//!   `report` (enabled by default)
//!
//! ## Logging
//!
//! Structural events are emitted through the [`log`] facade: tree creation
//! and clearing at `debug`, individual mutations and rotations at `trace`.
//! Nothing is printed unless the application installs a logger.
//!
//! ## Example
//!
//! ```rust
//! use arbor::prelude::*;
//!
//! let mut tree = OrderedTree::avl();
//! for key in 1..=100 {
//!     tree.insert(key, key.to_string());
//! }
//!
//! assert_eq!(tree.len(), 100);
//! assert_eq!(tree.height(), 7);
//! assert_eq!(tree.get(&42), Ok(Some(&"42".to_string())));
//! assert_eq!(tree.remove(&1000), Err(TreeError::NotFound));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the tree, its configuration enums, and its error types.
///
/// # Usage
///
/// ```rust
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::tree::{Balancing, InvariantViolation, OrderedTree, TraversalOrder, TreeError};

    #[cfg(feature = "diagnostics")]
    pub use crate::tree::{TreeLayout, TreeReport};
}

pub mod tree;
