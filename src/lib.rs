//! # avlmap
//!
//! A height-balanced ordered map for Rust, and two algorithms built on it.
//!
//! ## Overview
//!
//! - **AVL Map**: [`AvlMap`], an ordered associative container that keeps
//!   every subtree within one level of balance, so lookups, insertions and
//!   removals stay O(log N) no matter the insertion order.
//! - **Top-K Selection**: [`top_k`] ranks the entries of a map by value.
//! - **Word Frequencies**: [`word_frequencies`] turns a text stream into a
//!   map from normalized word to occurrence count.
//!
//! ## Example
//!
//! ```rust
//! use avlmap::prelude::*;
//!
//! let counts = word_frequencies_in("the cat and the hat");
//! assert_eq!(counts.get("the"), Some(&2));
//!
//! let ranked = top_k(&counts, 1);
//! assert_eq!(ranked, vec![("the".to_string(), 2)]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the map, its diagnostics, and both algorithms.
///
/// # Usage
///
/// ```rust
/// use avlmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algorithms::*;
    pub use crate::error::{Error, Result};
    pub use crate::tree::*;
}

pub mod algorithms;
pub mod error;
pub mod tree;

pub use algorithms::{
    WordFrequencies, normalize_token, top_k, top_k_by, word_frequencies, word_frequencies_in,
};
pub use error::{Error, Result};
pub use tree::{AvlMap, InvariantViolation, TreeDump};
