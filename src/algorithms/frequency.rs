//! Word-frequency counting over a text stream.
//!
//! Tokens are separated by whitespace. Each token is normalized by dropping
//! every non-alphanumeric character and lower-casing the rest; tokens with
//! nothing left (pure punctuation) are ignored.

use std::io::BufRead;

use tracing::debug;

use crate::error::Result;
use crate::tree::AvlMap;

/// Map from normalized word to the number of times it occurred.
pub type WordFrequencies = AvlMap<String, usize>;

/// Normalizes a single token.
///
/// Returns `None` when the token has no alphanumeric characters.
///
/// # Examples
///
/// ```rust
/// use avlmap::normalize_token;
///
/// assert_eq!(normalize_token("World..."), Some("world".to_string()));
/// assert_eq!(normalize_token("don't"), Some("dont".to_string()));
/// assert_eq!(normalize_token("?!"), None);
/// ```
#[must_use]
pub fn normalize_token(token: &str) -> Option<String> {
    let cleaned: String = token
        .chars()
        .filter(|character| character.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Running counts plus bookkeeping for the debug summary.
#[derive(Default)]
struct Tally {
    counts: WordFrequencies,
    tokens: usize,
    dropped: usize,
}

impl Tally {
    fn record(&mut self, text: &str) {
        for token in text.split_whitespace() {
            self.tokens += 1;
            match normalize_token(token) {
                Some(word) => *self.counts.get_or_insert_default(word) += 1,
                None => self.dropped += 1,
            }
        }
    }

    fn finish(self) -> WordFrequencies {
        debug!(
            tokens = self.tokens,
            dropped = self.dropped,
            distinct = self.counts.len(),
            "counted words"
        );
        self.counts
    }
}

/// Counts normalized words read from `reader`.
///
/// Tokens are processed in stream order, one line at a time.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if reading fails or the stream
/// is not valid UTF-8.
///
/// # Examples
///
/// ```rust
/// use avlmap::word_frequencies;
///
/// let counts = word_frequencies("Hello, world! World... hello!".as_bytes())?;
/// assert_eq!(counts.to_vec(), vec![("hello".to_string(), 2), ("world".to_string(), 2)]);
/// # Ok::<(), avlmap::Error>(())
/// ```
pub fn word_frequencies<R: BufRead>(mut reader: R) -> Result<WordFrequencies> {
    let mut tally = Tally::default();
    let mut line = String::new();
    while reader.read_line(&mut line)? != 0 {
        tally.record(&line);
        line.clear();
    }
    Ok(tally.finish())
}

/// Counts normalized words in an in-memory string.
///
/// # Examples
///
/// ```rust
/// use avlmap::word_frequencies_in;
///
/// let counts = word_frequencies_in("!!! ??? ...");
/// assert!(counts.is_empty());
/// ```
#[must_use]
pub fn word_frequencies_in(text: &str) -> WordFrequencies {
    let mut tally = Tally::default();
    tally.record(text);
    tally.finish()
}
