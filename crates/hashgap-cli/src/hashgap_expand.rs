//! Dictionary build step
//!
//! Usage: hashgap_expand <INPUT> <OUTPUT> [--column <NAME>]
//!
//! Reads the raw dictionary CSV, keeps the named column, appends the
//! lowercase form of every word, de-duplicates and writes a `Word` list.

use anyhow::{Context, Result};
use clap::Parser;
use hashgap_solver::DEFAULT_WORD_COLUMN;
use hashgap_solver::infra::dictionary_io::expand_dictionary;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "hashgap_expand")]
#[command(about = "Build the case-expanded word list used as the solver corpus")]
struct Args {
    /// Raw dictionary CSV
    input: PathBuf,

    /// Output word list
    output: PathBuf,

    /// Column holding the words
    #[arg(long, default_value = DEFAULT_WORD_COLUMN)]
    column: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("Reading {}...", args.input.display());
    let start = Instant::now();

    let summary = expand_dictionary(&args.input, &args.output, &args.column)
        .with_context(|| format!("failed to expand {}", args.input.display()))?;

    println!(
        "Read {} rows ({} skipped, {} missing cells)",
        summary.stats.rows, summary.stats.skipped_rows, summary.stats.missing_cells
    );
    if summary.stats.skipped_rows > 0 {
        warn!(
            skipped = summary.stats.skipped_rows,
            "rows without a readable word column were dropped"
        );
    }
    println!(
        "Wrote {} words ({} original entries) to {} in {:.2} seconds",
        summary.output_words,
        summary.input_words,
        args.output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
