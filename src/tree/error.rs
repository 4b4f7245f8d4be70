//! Error types for ordered trees.
//!
//! Recoverable conditions ([`TreeError`]) are returned from the façade as
//! explicit `Result`s. Structural breaches ([`InvariantViolation`]) are only
//! ever produced by the invariant checker; the mutating operations assert
//! them in debug builds instead of reporting them.

use std::fmt;

/// Represents a recoverable failure of an [`OrderedTree`](super::OrderedTree) operation.
///
/// # Examples
///
/// ```rust
/// use arbor::tree::{OrderedTree, TreeError};
///
/// let mut tree: OrderedTree<i32, &str> = OrderedTree::avl();
/// assert_eq!(tree.remove(&1), Err(TreeError::EmptyStructure));
///
/// tree.insert(2, "two");
/// assert_eq!(tree.remove(&1), Err(TreeError::NotFound));
/// assert_eq!(tree.try_insert(2, "TWO"), Err(TreeError::DuplicateKey));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The requested key is not present in the tree.
    NotFound,
    /// The operation needs at least one entry, but the tree is empty.
    EmptyStructure,
    /// The key is already present; the tree was left unchanged.
    DuplicateKey,
    /// A traversal order name could not be parsed.
    UnknownOrder(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(formatter, "key not found"),
            Self::EmptyStructure => write!(formatter, "tree is empty"),
            Self::DuplicateKey => write!(formatter, "key already present"),
            Self::UnknownOrder(name) => write!(formatter, "unknown traversal order: {name:?}"),
        }
    }
}

impl std::error::Error for TreeError {}

/// Describes a broken structural invariant found by the invariant checker.
///
/// Correct code never produces one of these; they exist so tests and
/// debugging sessions can say *which* invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An in-order walk did not yield strictly ascending keys.
    OrderViolated,
    /// A cached height disagrees with the heights of the node's children.
    HeightMismatch {
        /// Height computed from the children.
        expected: usize,
        /// Height stored in the node.
        cached: usize,
    },
    /// A node of an AVL tree has a balance factor outside `[-1, 1]`.
    Unbalanced {
        /// The offending balance factor (left height minus right height).
        balance_factor: isize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderViolated => write!(formatter, "in-order keys are not strictly ascending"),
            Self::HeightMismatch { expected, cached } => write!(
                formatter,
                "cached height {cached} does not match computed height {expected}"
            ),
            Self::Unbalanced { balance_factor } => {
                write!(formatter, "balance factor {balance_factor} is outside [-1, 1]")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
