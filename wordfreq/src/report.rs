//! Ranked word-count report
//!
//! Builds the top entries of a frequency map and renders them either as
//! aligned text or as JSON.

use std::io::Write;

use anyhow::Result;
use avlmap::{WordFrequencies, top_k};
use clap::ValueEnum;
use serde::Serialize;

/// Output format of the report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `count  word` lines, counts right-aligned
    #[default]
    Text,
    /// `{"distinct": n, "entries": [{"word": w, "count": c}, ...]}`
    Json,
}

/// One ranked word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub word: String,
    pub count: usize,
}

/// The most frequent words of an input, plus its distinct word count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub distinct: usize,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Ranks `counts` and keeps the `top` most frequent words.
    pub fn build(counts: &WordFrequencies, top: usize) -> Self {
        let entries = top_k(counts, top)
            .into_iter()
            .map(|(word, count)| ReportEntry { word, count })
            .collect();
        Self {
            distinct: counts.len(),
            entries,
        }
    }

    /// Writes the report in the requested format.
    pub fn write_to(&self, format: Format, out: &mut impl Write) -> Result<()> {
        match format {
            Format::Text => self.write_text(out),
            Format::Json => self.write_json(out),
        }
    }

    fn write_text(&self, out: &mut impl Write) -> Result<()> {
        let width = self
            .entries
            .iter()
            .map(|entry| entry.count.to_string().len())
            .max()
            .unwrap_or(0);
        for ReportEntry { word, count } in &self.entries {
            writeln!(out, "{count:>width$}  {word}")?;
        }
        Ok(())
    }

    fn write_json(&self, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
