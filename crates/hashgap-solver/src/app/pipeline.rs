//! Phase runner
//!
//! Phase 1 (find key) → Phase 2 (bulk lookup) → Phase 3 (gap closing),
//! each switchable through `SolverConfig::phases`.

use crate::app::config::SolverConfig;
use crate::app::gap_closer::{GapCloseReport, GapCloserOptions, close_gaps};
use crate::app::key_search::{KeySearchOutcome, KeySearchReport, SearchOptions, probe_keyspace, search_keyspace};
use crate::app::reconstruct::{build_lookup_table, fill_from_table};
use crate::domain::candidate::ConcatOrder;
use crate::domain::corpus::Corpus;
use crate::domain::digest::{DigestOracle, Sha256Oracle};
use crate::domain::lookup::Collision;
use crate::domain::report::{Reconstruction, ResolvedBy, Unresolved};
use crate::domain::target::TargetSet;
use crate::error::SolverError;
use crate::infra::dictionary_io::load_corpus;
use crate::infra::hints_io::{Hint, load_hints};
use crate::infra::puzzle_io::load_puzzle;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Elapsed time of one phase
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseTiming {
    pub phase: &'static str,
    pub elapsed_ms: u64,
}

/// Everything a solving run produced
#[derive(Clone, Debug, Serialize)]
pub struct SolveReport {
    /// Key used for Phases 2 and 3
    pub key: Option<String>,
    pub order: ConcatOrder,
    /// One entry per Phase 1 attempt (two when the opposite order was tried)
    pub key_search: Vec<KeySearchReport>,
    pub reconstruction: Reconstruction,
    pub unresolved: Vec<Unresolved>,
    /// Lookup table and corpus variant collisions
    pub collisions: Vec<Collision>,
    pub gap_closing: Option<GapCloseReport>,
    pub timings: Vec<PhaseTiming>,
}

impl SolveReport {
    pub fn is_complete(&self) -> bool {
        self.key.is_some() && self.reconstruction.is_complete()
    }

    /// Every distinct key seen in Phase 1 matches
    pub fn matched_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for attempt in &self.key_search {
            for key in attempt.distinct_keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

/// Inputs loaded up front, before any search starts
#[derive(Clone, Debug, Default)]
pub struct SolveInputs {
    pub targets: TargetSet,
    pub corpus: Corpus,
    pub hints: Vec<Hint>,
}

/// Validate `config` and load the puzzle, dictionary and hints
pub fn load_inputs(config: &SolverConfig) -> Result<SolveInputs, SolverError> {
    config.validate()?;

    let targets = load_puzzle(&config.puzzle_path)?;
    let corpus = load_corpus(&config.dictionary_path, &config.word_column)?;
    let hints = match &config.hints_path {
        Some(path) => load_hints(path)?,
        None => Vec::new(),
    };

    info!(
        targets = targets.len(),
        distinct = targets.distinct_len(),
        corpus = corpus.len(),
        hints = hints.len(),
        "inputs loaded"
    );
    Ok(SolveInputs {
        targets,
        corpus,
        hints,
    })
}

/// Load the inputs and run every enabled phase with SHA-256
pub fn run(config: &SolverConfig) -> Result<SolveReport, SolverError> {
    let inputs = load_inputs(config)?;
    Ok(run_with(&Sha256Oracle, config, &inputs, None::<fn(u64, u64)>))
}

/// Run every enabled phase on already loaded inputs
///
/// `on_progress` receives (keys scanned, keys total) during Phase 1.
pub fn run_with<O, F>(
    oracle: &O,
    config: &SolverConfig,
    inputs: &SolveInputs,
    on_progress: Option<F>,
) -> SolveReport
where
    O: DigestOracle,
    F: Fn(u64, u64) + Sync,
{
    let targets = &inputs.targets;
    let mut timings = Vec::new();
    let mut reconstruction = Reconstruction::unresolved_from(targets);
    let mut key_search = Vec::new();
    let mut order = config.order;

    // Phase 1
    let key = match &config.known_key {
        Some(key) => {
            info!(key = %key, %order, "using known key");
            Some(key.clone())
        }
        None => {
            let start = Instant::now();
            let orders = if config.try_both_orders {
                vec![order, order.opposite()]
            } else {
                vec![order]
            };

            let mut found = None;
            for attempt_order in orders {
                let report = find_key(oracle, config, inputs, attempt_order, on_progress.as_ref());
                let outcome = report.outcome.clone();
                key_search.push(report);

                match outcome {
                    KeySearchOutcome::Found { key } => {
                        order = attempt_order;
                        found = Some(key);
                        break;
                    }
                    KeySearchOutcome::TimedOut => break,
                    KeySearchOutcome::NotFound => {}
                }
            }
            timings.push(timing("find_key", start));
            found
        }
    };

    let Some(key) = key else {
        warn!("no key found; try another probe word or concatenation order");
        return SolveReport {
            key: None,
            order,
            key_search,
            unresolved: reconstruction.unresolved(),
            reconstruction,
            collisions: Vec::new(),
            gap_closing: None,
            timings,
        };
    };

    // Phase 2
    let mut collisions = Vec::new();
    if config.phases.lookup {
        let start = Instant::now();
        let table = build_lookup_table(oracle, &key, order, inputs.corpus.words());
        fill_from_table(&mut reconstruction, &table);
        collisions = table.collisions().to_vec();
        timings.push(timing("lookup", start));
    } else if let Some(attempt) = key_search.last() {
        for record in attempt.matches.iter().filter(|m| m.key == key) {
            reconstruction.resolve_digest(&record.digest, &record.word, ResolvedBy::KeySearch, None);
        }
    }

    // Phase 3
    let mut gap_closing = None;
    if config.phases.close_gaps && !reconstruction.is_complete() {
        let start = Instant::now();
        let options = GapCloserOptions {
            edit_budget: config.edit_budget,
            style: config.variant_style(),
            expand_corpus: config.expand_corpus_punctuation,
        };
        let report = close_gaps(
            oracle,
            &key,
            order,
            &mut reconstruction,
            inputs.corpus.words(),
            &inputs.hints,
            &options,
        );
        collisions.extend_from_slice(&report.collisions);
        gap_closing = Some(report);
        timings.push(timing("close_gaps", start));
    }

    info!(
        key = %key,
        resolved = reconstruction.resolved_count(),
        total = reconstruction.len(),
        collisions = collisions.len(),
        "solve finished"
    );
    SolveReport {
        key: Some(key),
        order,
        key_search,
        unresolved: reconstruction.unresolved(),
        reconstruction,
        collisions,
        gap_closing,
        timings,
    }
}

fn find_key<O, F>(
    oracle: &O,
    config: &SolverConfig,
    inputs: &SolveInputs,
    order: ConcatOrder,
    on_progress: Option<&F>,
) -> KeySearchReport
where
    O: DigestOracle,
    F: Fn(u64, u64) + Sync,
{
    let options = SearchOptions {
        order,
        workers: config.workers,
        timeout: config.timeout,
        on_progress,
    };

    match &config.probe_word {
        Some(word) => probe_keyspace(oracle, config.keyspace(), word, &inputs.targets, options),
        None => search_keyspace(
            oracle,
            config.keyspace(),
            inputs.corpus.words(),
            &inputs.targets,
            options,
        ),
    }
}

fn timing(phase: &'static str, start: Instant) -> PhaseTiming {
    PhaseTiming {
        phase,
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}
