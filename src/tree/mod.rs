//! Height-balanced binary search tree.
//!
//! - [`AvlMap`]: the ordered map
//! - [`TreeDump`]: sideways text rendering of the tree shape
//! - [`InvariantViolation`]: what [`AvlMap::validate`] reports
//!
//! # Examples
//!
//! ```rust
//! use avlmap::tree::AvlMap;
//!
//! // Ascending insertion would degrade a plain search tree into a list
//! let mut map = AvlMap::new();
//! for key in 0..1024 {
//!     map.insert(key, key * 2);
//! }
//! assert_eq!(map.len(), 1024);
//! assert!(map.height() <= 14);
//! assert_eq!(map.get(&512), Some(&1024));
//! ```

mod dump;
mod map;
mod node;
mod validate;

pub use dump::TreeDump;
pub use map::AvlMap;
pub use validate::InvariantViolation;
