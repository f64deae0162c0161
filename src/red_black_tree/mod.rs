//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Missing children are explicit black sentinel leaves, and the tree exposes the queries needed
//! to verify its coloring invariants from the outside.

mod check;
mod node;
mod snapshot;
mod tree;

pub use self::node::{Color, Node, NodeRef};
pub use self::snapshot::{SnapshotNode, TreeSnapshot};
pub use self::tree::RedBlackTree;

use std::error;
use std::fmt;
use std::result;

/// An invariant violation found by `RedBlackTree::check`, or a failure to encode a snapshot.
#[derive(Debug)]
pub enum Error {
    /// A sentinel leaf is colored red.
    RedSentinel,
    /// The root of a non-empty tree is red.
    RedRoot,
    /// A red node has a red child.
    RedRedViolation { key: u64 },
    /// The two subtrees of a node have different black heights.
    BlackHeightMismatch { key: u64, left: usize, right: usize },
    /// In-order traversal yielded `key` after a key that is not smaller.
    OrderViolation { previous: u64, key: u64 },
    /// A child does not point back at its parent, or the root has a parent.
    BrokenParentLink { key: Option<u64> },
    /// The number of reachable data nodes differs from the recorded length.
    LengthMismatch { expected: usize, actual: usize },
    /// A link points at a node that has already been freed.
    StaleHandle,
    /// A snapshot could not be encoded.
    SerdeError(bincode::Error),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Error {
        Error::SerdeError(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::SerdeError(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::RedSentinel => write!(f, "sentinel leaf is red"),
            Error::RedRoot => write!(f, "root is red"),
            Error::RedRedViolation { key } => write!(f, "red node {} has a red child", key),
            Error::BlackHeightMismatch { key, left, right } => write!(
                f,
                "node {} has black height {} on the left and {} on the right",
                key, left, right,
            ),
            Error::OrderViolation { previous, key } => {
                write!(f, "key {} follows key {} in order", key, previous)
            },
            Error::BrokenParentLink { key: Some(key) } => {
                write!(f, "node {} has a broken parent link", key)
            },
            Error::BrokenParentLink { key: None } => {
                write!(f, "sentinel leaf has a broken parent link")
            },
            Error::LengthMismatch { expected, actual } => write!(
                f,
                "tree records {} keys but {} are reachable",
                expected, actual,
            ),
            Error::StaleHandle => write!(f, "link points at a freed node"),
            Error::SerdeError(error) => write!(f, "{}", error),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
