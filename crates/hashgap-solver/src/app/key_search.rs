//! Keyspace search workflow
//!
//! Phase 1 recovers the key. The keyspace is cut into one contiguous
//! partition per worker and each worker tests `key || word` (or
//! `word || key`) for every key in its partition against the target set.
//!
//! Two modes share the same scan:
//! - full scan: every key × every corpus word, all matches collected
//! - probe: a single word, workers stop as soon as any of them finds a match

use crate::constants::CHECK_INTERVAL_DIGESTS;
use crate::domain::candidate::ConcatOrder;
use crate::domain::digest::DigestOracle;
use crate::domain::keyspace::KeySpace;
use crate::domain::report::MatchRecord;
use crate::domain::target::TargetSet;
use rayon::prelude::*;
use serde::Serialize;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Options for a keyspace search
#[derive(Clone)]
pub struct SearchOptions<F = fn(u64, u64)> {
    pub order: ConcatOrder,
    /// Number of partitions and threads
    pub workers: usize,
    /// Give up after this long; partial matches are still reported
    pub timeout: Option<Duration>,
    /// Progress callback (keys scanned, total keys)
    pub on_progress: Option<F>,
}

impl Default for SearchOptions<fn(u64, u64)> {
    fn default() -> Self {
        Self {
            order: ConcatOrder::KeyFirst,
            workers: 1,
            timeout: None,
            on_progress: None,
        }
    }
}

impl<F> SearchOptions<F> {
    pub fn with_order(mut self, order: ConcatOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the progress callback
    pub fn with_progress<G>(self, callback: G) -> SearchOptions<G> {
        SearchOptions {
            order: self.order,
            workers: self.workers,
            timeout: self.timeout,
            on_progress: Some(callback),
        }
    }
}

/// How a keyspace search ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeySearchOutcome {
    Found { key: String },
    /// Keyspace exhausted without a match
    NotFound,
    /// Deadline reached before a match
    TimedOut,
}

/// Result of a keyspace search
#[derive(Clone, Debug, Serialize)]
pub struct KeySearchReport {
    pub outcome: KeySearchOutcome,
    pub order: ConcatOrder,
    /// Matches sorted by the first puzzle line they resolve
    pub matches: Vec<MatchRecord>,
    pub keys_scanned: u64,
    pub keys_total: u64,
    pub elapsed_ms: u64,
}

impl KeySearchReport {
    pub fn key(&self) -> Option<&str> {
        match &self.outcome {
            KeySearchOutcome::Found { key } => Some(key),
            _ => None,
        }
    }

    /// Distinct keys among the matches, in match order
    pub fn distinct_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for record in &self.matches {
            if !keys.contains(&record.key.as_str()) {
                keys.push(&record.key);
            }
        }
        keys
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

/// Scan every key against every word, collecting all matches
pub fn search_keyspace<O, F>(
    oracle: &O,
    keyspace: KeySpace,
    words: &[String],
    targets: &TargetSet,
    options: SearchOptions<F>,
) -> KeySearchReport
where
    O: DigestOracle,
    F: Fn(u64, u64) + Sync,
{
    run_search(oracle, keyspace, words, targets, options, false)
}

/// Scan every key against one probe word, stopping at the first match
pub fn probe_keyspace<O, F>(
    oracle: &O,
    keyspace: KeySpace,
    word: &str,
    targets: &TargetSet,
    options: SearchOptions<F>,
) -> KeySearchReport
where
    O: DigestOracle,
    F: Fn(u64, u64) + Sync,
{
    let words = [word.to_string()];
    run_search(oracle, keyspace, &words, targets, options, true)
}

/// Run `f` on a pool of `workers` threads
///
/// Falls back to the global pool if a dedicated pool cannot be built.
pub fn run_in_pool<R, F>(workers: usize, f: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(f),
        Err(e) => {
            warn!(error = %e, "could not build worker pool, using the global pool");
            f()
        }
    }
}

/// Shared, read-only state for every worker
struct ScanContext<'a, O, F> {
    oracle: &'a O,
    keyspace: KeySpace,
    words: &'a [String],
    targets: &'a TargetSet,
    order: ConcatOrder,
    first_match: bool,
    deadline: Option<Instant>,
    stop: AtomicBool,
    progress: AtomicU64,
    on_progress: Option<F>,
}

/// What one worker found in its partition
#[derive(Default)]
struct PartitionScan {
    matches: Vec<MatchRecord>,
    scanned: u64,
    timed_out: bool,
}

fn run_search<O, F>(
    oracle: &O,
    keyspace: KeySpace,
    words: &[String],
    targets: &TargetSet,
    options: SearchOptions<F>,
    first_match: bool,
) -> KeySearchReport
where
    O: DigestOracle,
    F: Fn(u64, u64) + Sync,
{
    let start = Instant::now();
    let SearchOptions {
        order,
        workers,
        timeout,
        on_progress,
    } = options;

    let finish = |outcome, matches, keys_scanned| KeySearchReport {
        outcome,
        order,
        matches,
        keys_scanned,
        keys_total: keyspace.total(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    if words.is_empty() || targets.is_empty() {
        info!(
            words = words.len(),
            targets = targets.len(),
            "nothing to search"
        );
        return finish(KeySearchOutcome::NotFound, Vec::new(), 0);
    }

    let partitions = keyspace.partition(workers);
    info!(
        keys = keyspace.total(),
        width = keyspace.width(),
        words = words.len(),
        targets = targets.distinct_len(),
        partitions = partitions.len(),
        %order,
        first_match,
        "starting keyspace scan"
    );

    let ctx = ScanContext {
        oracle,
        keyspace,
        words,
        targets,
        order,
        first_match,
        deadline: timeout.map(|t| start + t),
        stop: AtomicBool::new(false),
        progress: AtomicU64::new(0),
        on_progress,
    };

    let scans: Vec<PartitionScan> = run_in_pool(workers, || {
        partitions
            .into_par_iter()
            .map(|range| scan_partition(&ctx, range))
            .collect()
    });

    let keys_scanned = scans.iter().map(|s| s.scanned).sum();
    let timed_out = scans.iter().any(|s| s.timed_out);
    let mut matches: Vec<MatchRecord> = scans.into_iter().flat_map(|s| s.matches).collect();
    matches.sort_by(|a, b| {
        let line = |m: &MatchRecord| targets.first_line(&m.digest).unwrap_or(usize::MAX);
        line(a)
            .cmp(&line(b))
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.word.cmp(&b.word))
    });

    if let Some(callback) = &ctx.on_progress {
        callback(keys_scanned, keyspace.total());
    }

    let outcome = match matches.first() {
        Some(first) => KeySearchOutcome::Found {
            key: first.key.clone(),
        },
        None if timed_out => KeySearchOutcome::TimedOut,
        None => KeySearchOutcome::NotFound,
    };

    let report = finish(outcome, matches, keys_scanned);
    match &report.outcome {
        KeySearchOutcome::Found { key } => {
            let keys = report.distinct_keys();
            if keys.len() > 1 {
                warn!(?keys, "matches disagree on the key, using the first by line");
            }
            info!(
                key = %key,
                matches = report.matches.len(),
                scanned = report.keys_scanned,
                elapsed_ms = report.elapsed_ms,
                "key found"
            );
        }
        KeySearchOutcome::TimedOut => warn!(
            scanned = report.keys_scanned,
            total = report.keys_total,
            elapsed_ms = report.elapsed_ms,
            "keyspace scan timed out"
        ),
        KeySearchOutcome::NotFound => info!(
            scanned = report.keys_scanned,
            %order,
            "keyspace exhausted without a match"
        ),
    }
    report
}

/// Scan one partition
fn scan_partition<O, F>(ctx: &ScanContext<'_, O, F>, range: Range<u64>) -> PartitionScan
where
    O: DigestOracle,
    F: Fn(u64, u64) + Sync,
{
    debug!(start = range.start, end = range.end, "partition started");

    let mut scan = PartitionScan::default();
    let mut key = String::with_capacity(ctx.keyspace.width());
    let work_per_key = (ctx.words.len() as u64).max(1);
    let mut pending_keys = 0u64;
    let mut pending_work = 0u64;

    for n in range {
        if ctx.first_match && ctx.stop.load(Ordering::Relaxed) {
            break;
        }
        ctx.keyspace.write_key(n, &mut key);

        let before = scan.matches.len();
        for word in ctx.words {
            let digest = ctx.order.digest(ctx.oracle, &key, word);
            if ctx.targets.contains(&digest) {
                scan.matches.push(MatchRecord {
                    key: key.clone(),
                    word: word.clone(),
                    digest,
                });
            }
        }
        scan.scanned += 1;
        pending_keys += 1;
        pending_work += work_per_key;

        if ctx.first_match && scan.matches.len() > before {
            ctx.stop.store(true, Ordering::Relaxed);
            break;
        }

        if pending_work >= CHECK_INTERVAL_DIGESTS {
            report_progress(ctx, pending_keys);
            pending_keys = 0;
            pending_work = 0;

            if ctx.deadline.is_some_and(|d| Instant::now() >= d) {
                scan.timed_out = true;
                break;
            }
        }
    }

    if pending_keys > 0 {
        report_progress(ctx, pending_keys);
    }

    debug!(
        scanned = scan.scanned,
        matches = scan.matches.len(),
        "partition finished"
    );
    scan
}

fn report_progress<O, F>(ctx: &ScanContext<'_, O, F>, keys: u64)
where
    F: Fn(u64, u64) + Sync,
{
    let done = ctx.progress.fetch_add(keys, Ordering::Relaxed) + keys;
    if let Some(callback) = &ctx.on_progress {
        callback(done, ctx.keyspace.total());
    }
}
