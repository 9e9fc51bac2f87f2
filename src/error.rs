//! Error types for fallible library operations.
//!
//! The map itself never fails: lookups report absence through `Option`
//! and removing a missing key is a no-op. Only the algorithms that read
//! external input can fail, and they report it through [`Error`].

use std::io;

use thiserror::Error;

/// Errors returned by the stream-reading algorithms.
#[derive(Debug, Error)]
pub enum Error {
    /// The token stream could not be read (I/O failure or invalid UTF-8).
    #[error("failed to read token stream: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
