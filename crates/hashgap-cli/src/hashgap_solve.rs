//! Keyed digest puzzle solver CLI
//!
//! Usage: hashgap_solve <PUZZLE> <DICTIONARY> [options]
//!
//! Example:
//!   hashgap_solve easy_puzzle.txt words.csv
//!   hashgap_solve hard_puzzle.txt words.csv --preset hard --hints stragglers.txt
//!   hashgap_solve puzzle.txt words.csv --key 5262 --json
//!
//! Runs Phase 1 (find key), Phase 2 (lookup) and Phase 3 (gap closing) and
//! prints one line per puzzle position.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hashgap_solver::app::config::{Phases, SolverConfig};
use hashgap_solver::app::pipeline::{SolveReport, load_inputs, run_with};
use hashgap_solver::domain::candidate::ConcatOrder;
use hashgap_solver::domain::variants::CaseVariant;
use hashgap_solver::{DEFAULT_WORD_COLUMN, Sha256Oracle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// 4-digit keys, full corpus scan
    Easy,
    /// 9-digit keys, single-word probe
    Hard,
}

#[derive(Parser, Debug)]
#[command(name = "hashgap_solve")]
#[command(about = "Recover the key and words behind SHA-256(key || word) digests")]
struct Args {
    /// Puzzle file, one hex digest per line
    puzzle: PathBuf,

    /// Dictionary CSV with a word column
    dictionary: PathBuf,

    #[arg(long, value_enum, default_value_t = Preset::Easy)]
    preset: Preset,

    /// Dictionary column holding the words
    #[arg(long, default_value = DEFAULT_WORD_COLUMN)]
    column: String,

    /// Digits per key
    #[arg(long)]
    key_width: Option<usize>,

    /// Number of keys searched, starting at 0
    #[arg(long)]
    keyspace: Option<u64>,

    /// Known key; skips the key search
    #[arg(long)]
    key: Option<String>,

    /// Probe the keyspace with one word instead of the whole corpus
    #[arg(long, conflicts_with = "full_scan")]
    probe: Option<String>,

    /// Scan every key against the whole corpus, even with the hard preset
    #[arg(long)]
    full_scan: bool,

    /// Concatenation order: key_first or word_first
    #[arg(long, default_value = "key_first")]
    order: ConcatOrder,

    /// Retry the key search with the opposite order when nothing matches
    #[arg(long)]
    try_both_orders: bool,

    /// Worker threads (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Give up the key search after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Edit distance tried around hinted words (0, 1 or 2)
    #[arg(long, default_value_t = 2)]
    edit_budget: u8,

    /// Punctuation suffixes, one per character (the bare word is always tried)
    #[arg(long)]
    suffixes: Option<String>,

    /// Case forms: as-is, lower, capitalized
    #[arg(long, value_delimiter = ',')]
    cases: Vec<CaseVariant>,

    /// Straggler hints file (`<line> <word> [alt ...]`)
    #[arg(long)]
    hints: Option<PathBuf>,

    /// Skip the corpus-wide suffix/case pass in gap closing
    #[arg(long)]
    no_corpus_variants: bool,

    /// Skip the lookup phase
    #[arg(long)]
    no_lookup: bool,

    /// Skip gap closing
    #[arg(long)]
    no_gap_closing: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn to_config(&self) -> SolverConfig {
        let mut config = match self.preset {
            Preset::Easy => SolverConfig::easy(&self.puzzle, &self.dictionary),
            Preset::Hard => SolverConfig::hard(&self.puzzle, &self.dictionary),
        };

        config.word_column = self.column.clone();
        if let Some(width) = self.key_width {
            config.key_width = width;
        }
        if let Some(size) = self.keyspace {
            config.keyspace_size = size;
        }
        config.known_key = self.key.clone();
        if self.full_scan {
            config.probe_word = None;
        } else if let Some(word) = &self.probe {
            config.probe_word = Some(word.clone());
        }
        config.order = self.order;
        config.try_both_orders = self.try_both_orders;
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        config.edit_budget = self.edit_budget;
        if let Some(suffixes) = &self.suffixes {
            config.suffixes = std::iter::once(String::new())
                .chain(suffixes.chars().map(String::from))
                .collect();
        }
        if !self.cases.is_empty() {
            config.case_variants = self.cases.clone();
        }
        config.hints_path = self.hints.clone();
        config.expand_corpus_punctuation = !self.no_corpus_variants;
        config.phases = Phases {
            find_key: self.key.is_none(),
            lookup: !self.no_lookup,
            close_gaps: !self.no_gap_closing,
        };
        config
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Whole percent of `current` over `total`, computed without overflow
fn percent_of(current: u64, total: u64) -> u64 {
    if total == 0 {
        return 100;
    }
    (u128::from(current) * 100 / u128::from(total)) as u64
}

fn print_report(report: &SolveReport) {
    println!();
    println!("--- Decoded message ---");
    for line in report.reconstruction.render_lines() {
        println!("{}", line);
    }

    println!();
    println!("--- Summary ---");
    match &report.key {
        Some(key) => println!("Key: {} ({})", key, report.order),
        None => println!("Key: not found"),
    }
    let keys = report.matched_keys();
    if keys.len() > 1 {
        println!("Distinct keys in matches: {}", keys.join(", "));
    }
    println!(
        "Resolved: {}/{}",
        report.reconstruction.resolved_count(),
        report.reconstruction.len()
    );
    if !report.collisions.is_empty() {
        println!("Collisions: {}", report.collisions.len());
        for c in &report.collisions {
            println!("  {} kept '{}', rejected '{}'", c.digest, c.kept, c.rejected);
        }
    }
    if !report.unresolved.is_empty() {
        println!("Unresolved:");
        for u in &report.unresolved {
            println!("  Line {}: {}", u.line, u.digest);
        }
    }
    for t in &report.timings {
        println!("[{}] {:.3} seconds", t.phase, t.elapsed_ms as f64 / 1000.0);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.to_config();
    let inputs = load_inputs(&config)
        .with_context(|| format!("cannot start solving {}", config.puzzle_path.display()))?;

    let start = Instant::now();
    let last_percent = AtomicU64::new(u64::MAX);
    let progress_callback = |current: u64, total: u64| {
        let percent = percent_of(current, total);
        if last_percent.swap(percent, Ordering::Relaxed) != percent {
            eprint!("\r[Key search] Progress: {}% ({}/{})", percent, current, total);
            let _ = io::stderr().flush();
        }
    };

    let report = run_with(&Sha256Oracle, &config, &inputs, Some(progress_callback));
    eprintln!();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        println!("Total: {:.2} seconds", start.elapsed().as_secs_f64());
    }

    if !report.unresolved.is_empty() {
        warn!(lines = report.unresolved.len(), "some lines are still unresolved");
    }
    if report.key.is_none() {
        warn!("no key found; try another --probe word or --try-both-orders");
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_large_counts() {
        assert_eq!(percent_of(u64::MAX, u64::MAX), 100);
        assert_eq!(percent_of(u64::MAX / 2, u64::MAX), 49);
        assert_eq!(percent_of(999_999_999, 1_000_000_000), 99);
    }

    #[test]
    fn test_percent_of_empty_total() {
        assert_eq!(percent_of(0, 0), 100);
    }
}
