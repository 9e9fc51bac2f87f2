//! Full structural verification of an [`AvlMap`].
//!
//! The rebalance engine already asserts its local postconditions in debug
//! builds; [`AvlMap::validate`] walks the whole tree and is meant for tests
//! and diagnostics.

use thiserror::Error;

use super::map::AvlMap;
use super::node::{Node, height};

/// A broken structural invariant found by [`AvlMap::validate`].
///
/// Depths are counted from the root, which has depth 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A key is not strictly between the bounds set by its ancestors.
    #[error("key at depth {depth} breaks search-tree order")]
    OutOfOrder {
        /// Depth of the offending node.
        depth: usize,
    },
    /// Subtree heights differ by more than one.
    #[error("node at depth {depth} has balance factor {balance}")]
    Unbalanced {
        /// Depth of the offending node.
        depth: usize,
        /// `height(left) - height(right)`.
        balance: i64,
    },
    /// The cached height does not match the subtree.
    #[error("node at depth {depth} caches height {cached} but has height {actual}")]
    StaleHeight {
        /// Depth of the offending node.
        depth: usize,
        /// Height stored on the node.
        cached: u32,
        /// Height computed from its children.
        actual: u32,
    },
    /// The cached entry count does not match the number of nodes.
    #[error("map reports {cached} entries but holds {actual}")]
    LengthMismatch {
        /// Value returned by `len()`.
        cached: usize,
        /// Number of reachable nodes.
        actual: usize,
    },
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Checks every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. A map built only
    /// through the public API never fails this check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map: AvlMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// assert_eq!(map.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut count = 0;
        check_subtree(self.root.as_deref(), None, None, 0, &mut count)?;
        if count == self.length {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                cached: self.length,
                actual: count,
            })
        }
    }
}

fn check_subtree<K: Ord, V>(
    node: Option<&Node<K, V>>,
    lower: Option<&K>,
    upper: Option<&K>,
    depth: usize,
    count: &mut usize,
) -> Result<(), InvariantViolation> {
    let Some(node) = node else {
        return Ok(());
    };
    let above_lower = lower.is_none_or(|bound| *bound < node.key);
    let below_upper = upper.is_none_or(|bound| node.key < *bound);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::OutOfOrder { depth });
    }

    *count += 1;
    check_subtree(node.left.as_deref(), lower, Some(&node.key), depth + 1, count)?;
    check_subtree(node.right.as_deref(), Some(&node.key), upper, depth + 1, count)?;

    let actual = 1 + height(node.left.as_deref()).max(height(node.right.as_deref()));
    if node.height != actual {
        return Err(InvariantViolation::StaleHeight {
            depth,
            cached: node.height,
            actual,
        });
    }
    let balance = node.balance_factor();
    if balance.abs() > 1 {
        return Err(InvariantViolation::Unbalanced { depth, balance });
    }
    Ok(())
}
