//! Message reconstruction workflow
//!
//! Phase 2: with the key known, hash every corpus word once into a
//! digest → word table and decode each puzzle line by lookup.

use crate::domain::candidate::ConcatOrder;
use crate::domain::digest::{Digest, DigestOracle};
use crate::domain::lookup::LookupTable;
use crate::domain::report::{Reconstruction, ResolvedBy};
use crate::domain::target::TargetSet;
use rayon::prelude::*;
use tracing::info;

/// Build the lookup table for `key`
///
/// Hashing runs in parallel; insertion is sequential in corpus order, so the
/// word kept on a collision is always the earlier one.
pub fn build_lookup_table<O: DigestOracle>(
    oracle: &O,
    key: &str,
    order: ConcatOrder,
    words: &[String],
) -> LookupTable {
    let digests: Vec<Digest> = words
        .par_iter()
        .map(|word| order.digest(oracle, key, word))
        .collect();

    let mut table = LookupTable::with_capacity(words.len());
    for (digest, word) in digests.into_iter().zip(words) {
        table.insert(digest, word);
    }

    info!(
        words = words.len(),
        entries = table.len(),
        collisions = table.collisions().len(),
        "lookup table built"
    );
    table
}

/// Decode every line through `table`
pub fn reconstruct(targets: &TargetSet, table: &LookupTable) -> Reconstruction {
    let mut reconstruction = Reconstruction::unresolved_from(targets);
    fill_from_table(&mut reconstruction, table);
    reconstruction
}

/// Resolve every still-open line whose digest is in `table`; returns the count
pub fn fill_from_table(reconstruction: &mut Reconstruction, table: &LookupTable) -> usize {
    let hits: Vec<(usize, String)> = reconstruction
        .unresolved()
        .into_iter()
        .filter_map(|u| table.get(&u.digest).map(|w| (u.line, w.to_string())))
        .collect();

    let mut resolved = 0;
    for (line, word) in &hits {
        if reconstruction.resolve(*line, word, ResolvedBy::Lookup, None) {
            resolved += 1;
        }
    }

    info!(
        resolved,
        unresolved = reconstruction.len() - reconstruction.resolved_count(),
        "lookup pass finished"
    );
    resolved
}
