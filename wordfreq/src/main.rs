//! wordfreq - print the most frequent words of a text
//!
//! Usage:
//!   wordfreq [INPUT] [--top N] [--format text|json] [--log-level LEVEL]
//!
//! Reads standard input when INPUT is absent or `-`.

mod report;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use avlmap::{WordFrequencies, word_frequencies};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use report::{Format, Report};

#[derive(Parser, Debug)]
#[command(name = "wordfreq")]
#[command(about = "Count word frequencies and print the most common words")]
struct Cli {
    /// Text file to read; `-` or nothing reads standard input
    input: Option<PathBuf>,

    /// Number of entries to print
    #[arg(long, short = 'n', env = "WORDFREQ_TOP", default_value_t = 10)]
    top: usize,

    /// Output format
    #[arg(long, short = 'f', env = "WORDFREQ_FORMAT", value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Tracing filter for diagnostics on stderr (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level: {level}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
    Ok(())
}

fn count_words(input: Option<&Path>) -> Result<WordFrequencies> {
    match input {
        None => count_stdin(),
        Some(path) if path == Path::new("-") => count_stdin(),
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading file");
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            word_frequencies(BufReader::new(file))
                .with_context(|| format!("failed to read {}", path.display()))
        }
    }
}

fn count_stdin() -> Result<WordFrequencies> {
    tracing::debug!("reading standard input");
    word_frequencies(io::stdin().lock()).context("failed to read standard input")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let counts = count_words(cli.input.as_deref())?;
    let report = Report::build(&counts, cli.top);
    tracing::info!(distinct = report.distinct, shown = report.entries.len(), "report ready");

    report
        .write_to(cli.format, &mut io::stdout().lock())
        .context("failed to write report")
}
