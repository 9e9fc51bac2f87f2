//! Algorithms that use [`AvlMap`](crate::AvlMap) as their storage engine.
//!
//! - [`top_k`] / [`top_k_by`]: rank the entries of a map by value
//! - [`word_frequencies`] / [`word_frequencies_in`]: count normalized words
//!
//! Both treat the map as a black box: they go through its public API only.

mod frequency;
mod top_k;

pub use frequency::{WordFrequencies, normalize_token, word_frequencies, word_frequencies_in};
pub use top_k::{top_k, top_k_by};
