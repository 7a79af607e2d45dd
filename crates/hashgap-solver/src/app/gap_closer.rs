//! Gap closing workflow
//!
//! Phase 3: with the key known, resolve lines the lookup table missed.
//!
//! 1. Hinted lines: the expected word and its alternatives are checked
//!    exactly, then widened ring by ring up to the edit budget; every
//!    candidate is expanded with the suffix and case sets.
//! 2. Remaining lines: every corpus word is expanded with the suffix and
//!    case sets and tested against all still-unresolved digests at once.

use crate::constants::MAX_EDIT_BUDGET;
use crate::domain::candidate::ConcatOrder;
use crate::domain::digest::{Digest, DigestOracle, DigestSet};
use crate::domain::lookup::{Collision, InsertOutcome, LookupTable};
use crate::domain::report::{Reconstruction, ResolvedBy, Unresolved};
use crate::domain::variants::{VariantStyle, capitalize, edits_within_1};
use crate::infra::hints_io::Hint;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Options for gap closing
#[derive(Clone, Debug)]
pub struct GapCloserOptions {
    /// Maximum edit distance tried around hinted words
    pub edit_budget: u8,
    pub style: VariantStyle,
    /// Also try suffix/case variants of every corpus word
    pub expand_corpus: bool,
}

impl Default for GapCloserOptions {
    fn default() -> Self {
        Self {
            edit_budget: MAX_EDIT_BUDGET,
            style: VariantStyle::default(),
            expand_corpus: true,
        }
    }
}

/// One line resolved during gap closing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GapFill {
    pub line: usize,
    pub word: String,
    /// Hinted or corpus word the variant was derived from
    pub base_word: String,
    pub resolved_by: ResolvedBy,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct GapCloseReport {
    pub filled: Vec<GapFill>,
    pub still_failing: Vec<Unresolved>,
    /// Distinct corpus variants that hashed to the same open digest
    pub collisions: Vec<Collision>,
    /// Digests computed
    pub variants_tested: u64,
}

/// Run both gap-closing passes against `reconstruction`
pub fn close_gaps<O: DigestOracle>(
    oracle: &O,
    key: &str,
    order: ConcatOrder,
    reconstruction: &mut Reconstruction,
    corpus: &[String],
    hints: &[Hint],
    options: &GapCloserOptions,
) -> GapCloseReport {
    let mut report = GapCloseReport::default();
    let tested = AtomicU64::new(0);
    let ctx = VariantCheck {
        oracle,
        key,
        order,
        style: &options.style,
        tested: &tested,
    };

    let mut hints: Vec<&Hint> = hints.iter().collect();
    hints.sort_by_key(|h| h.line);
    for hint in hints {
        resolve_hint(&ctx, reconstruction, hint, options.edit_budget, &mut report);
    }

    if options.expand_corpus && !reconstruction.is_complete() {
        resolve_from_corpus(&ctx, reconstruction, corpus, &mut report);
    }

    report.variants_tested = tested.load(Ordering::Relaxed);
    report.still_failing = reconstruction.unresolved();
    info!(
        filled = report.filled.len(),
        still_failing = report.still_failing.len(),
        collisions = report.collisions.len(),
        variants_tested = report.variants_tested,
        "gap closing finished"
    );
    report
}

/// Candidate words for `base`: the word itself, then each edit ring in sorted order
pub fn edit_rings(base: &str, budget: u8) -> Vec<String> {
    let mut out = vec![base.to_string()];
    let mut seen: HashSet<String> = HashSet::from([base.to_string()]);
    let mut frontier = vec![base.to_string()];

    for _ in 0..budget.min(MAX_EDIT_BUDGET) {
        let ring: HashSet<String> = frontier
            .iter()
            .flat_map(|w| edits_within_1(w))
            .filter(|w| !seen.contains(w))
            .collect();
        let mut ring: Vec<String> = ring.into_iter().collect();
        ring.sort();
        seen.extend(ring.iter().cloned());
        out.extend(ring.iter().cloned());
        frontier = ring;
    }

    out
}

struct VariantCheck<'a, O> {
    oracle: &'a O,
    key: &'a str,
    order: ConcatOrder,
    style: &'a VariantStyle,
    tested: &'a AtomicU64,
}

impl<O: DigestOracle> VariantCheck<'_, O> {
    fn digest(&self, word: &str) -> Digest {
        self.order.digest(self.oracle, self.key, word)
    }

    /// First surface variant of `word` hashing to `target`
    fn find_variant(&self, word: &str, target: &Digest) -> Option<String> {
        let variants = self.style.expand(word);
        self.tested.fetch_add(variants.len() as u64, Ordering::Relaxed);
        variants.into_iter().find(|v| self.digest(v) == *target)
    }
}

fn resolve_hint<O: DigestOracle>(
    ctx: &VariantCheck<'_, O>,
    reconstruction: &mut Reconstruction,
    hint: &Hint,
    budget: u8,
    report: &mut GapCloseReport,
) {
    let Some(position) = reconstruction.get(hint.line) else {
        warn!(line = hint.line, word = %hint.word, "hint refers to a line past the end of the puzzle");
        return;
    };
    if let Some(word) = &position.word {
        debug!(line = hint.line, hinted = %hint.word, resolved = %word, "hinted line already resolved");
        return;
    }
    let target = position.digest;

    // Exact text first: the word as given or capitalized
    let exact = hint.bases().find_map(|base| {
        [base.to_string(), capitalize(base)]
            .into_iter()
            .inspect(|_| {
                ctx.tested.fetch_add(1, Ordering::Relaxed);
            })
            .find(|w| ctx.digest(w) == target)
            .map(|w| (w, base.to_string()))
    });
    if let Some((word, base)) = exact {
        info!(line = hint.line, word = %word, "hint verified");
        record(reconstruction, &target, &word, &base, ResolvedBy::HintVariant, report);
        return;
    }

    let mut seen = HashSet::new();
    let candidates: Vec<(&str, String)> = hint
        .bases()
        .flat_map(|base| edit_rings(base, budget).into_iter().map(move |c| (base, c)))
        .filter(|(_, c)| seen.insert(c.clone()))
        .collect();
    debug!(line = hint.line, candidates = candidates.len(), "searching hint variants");

    let found = candidates
        .par_iter()
        .find_map_first(|(base, candidate)| {
            ctx.find_variant(candidate, &target)
                .map(|word| (word, base.to_string()))
        });

    match found {
        Some((word, base)) => {
            info!(line = hint.line, word = %word, base = %base, "hint variant matched");
            record(reconstruction, &target, &word, &base, ResolvedBy::HintVariant, report);
        }
        None => warn!(
            line = hint.line,
            word = %hint.word,
            budget,
            "no variant of the hinted word matches"
        ),
    }
}

fn resolve_from_corpus<O: DigestOracle>(
    ctx: &VariantCheck<'_, O>,
    reconstruction: &mut Reconstruction,
    corpus: &[String],
    report: &mut GapCloseReport,
) {
    let open: DigestSet = reconstruction.unresolved().iter().map(|u| u.digest).collect();
    debug!(words = corpus.len(), targets = open.len(), "expanding corpus variants");

    // Ordered collect keeps corpus order, so the first variant wins a shared digest
    let hits: Vec<Vec<(Digest, String, &str)>> = corpus
        .par_iter()
        .map(|word| {
            let variants = ctx.style.expand(word);
            ctx.tested.fetch_add(variants.len() as u64, Ordering::Relaxed);
            variants
                .into_iter()
                .filter_map(|v| {
                    let digest = ctx.digest(&v);
                    open.contains(&digest).then_some((digest, v, word.as_str()))
                })
                .collect()
        })
        .collect();

    let mut table = LookupTable::new();
    for (digest, word, base) in hits.into_iter().flatten() {
        if table.insert(digest, &word) == InsertOutcome::Inserted {
            record(reconstruction, &digest, &word, base, ResolvedBy::CorpusVariant, report);
        }
    }
    report.collisions.extend_from_slice(table.collisions());
}

fn record(
    reconstruction: &mut Reconstruction,
    digest: &Digest,
    word: &str,
    base: &str,
    by: ResolvedBy,
    report: &mut GapCloseReport,
) {
    for line in reconstruction.resolve_digest(digest, word, by, Some(base)) {
        report.filled.push(GapFill {
            line,
            word: word.to_string(),
            base_word: base.to_string(),
            resolved_by: by,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digest::Sha256Oracle;
    use crate::domain::target::TargetSet;
    use crate::domain::variants::CaseVariant;
    use sha2::{Digest as _, Sha256};

    const KEY: &str = "5262";

    /// Case-insensitive stand-in: "Tyrant." and "tyrant." share a digest
    struct FoldingOracle;

    impl DigestOracle for FoldingOracle {
        fn digest_parts(&self, parts: &[&[u8]]) -> Digest {
            let mut hasher = Sha256::new();
            for part in parts {
                hasher.update(part.to_ascii_lowercase());
            }
            Digest::from_bytes(hasher.finalize().into())
        }
    }

    fn targets(words: &[&str]) -> TargetSet {
        TargetSet::new(
            words
                .iter()
                .map(|w| ConcatOrder::KeyFirst.digest(&Sha256Oracle, KEY, w))
                .collect(),
        )
    }

    fn corpus(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run(rec: &mut Reconstruction, corpus: &[String], hints: &[Hint], options: &GapCloserOptions) -> GapCloseReport {
        close_gaps(&Sha256Oracle, KEY, ConcatOrder::KeyFirst, rec, corpus, hints, options)
    }

    #[test]
    fn test_edit_rings_order() {
        let rings = edit_rings("cat", 1);
        assert_eq!(rings[0], "cat");
        assert_eq!(rings.len(), 182);
        let mut tail = rings[1..].to_vec();
        tail.sort();
        assert_eq!(tail, rings[1..]);

        assert_eq!(edit_rings("cat", 0), vec!["cat".to_string()]);
        let two = edit_rings("ab", 2);
        let distinct: HashSet<&String> = two.iter().collect();
        assert_eq!(distinct.len(), two.len());
        assert!(two.contains(&"ba".to_string()));
        assert!(two.contains(&"xaby".to_string()));
    }

    #[test]
    fn test_corpus_punctuation_resolves_tyrant() {
        let t = targets(&["the", "tyrant.", "falls"]);
        let mut rec = Reconstruction::unresolved_from(&t);
        rec.resolve(1, "the", ResolvedBy::Lookup, None);
        rec.resolve(3, "falls", ResolvedBy::Lookup, None);

        let report = run(&mut rec, &corpus(&["the", "tyrant", "falls"]), &[], &GapCloserOptions::default());

        assert!(rec.is_complete());
        assert_eq!(rec.sentence(), "the tyrant. falls");
        let line = rec.get(2).unwrap();
        assert_eq!(line.resolved_by, Some(ResolvedBy::CorpusVariant));
        assert_eq!(line.base_word.as_deref(), Some("tyrant"));
        assert_eq!(report.filled.len(), 1);
        assert!(report.still_failing.is_empty());
    }

    #[test]
    fn test_corpus_variant_collision_keeps_first() {
        let t = TargetSet::new(vec![FoldingOracle.digest(b"5262tyrant.")]);
        let mut rec = Reconstruction::unresolved_from(&t);
        let options = GapCloserOptions {
            style: VariantStyle::new(vec![".".into()], vec![CaseVariant::AsIs]),
            ..Default::default()
        };

        let report = close_gaps(
            &FoldingOracle,
            KEY,
            ConcatOrder::KeyFirst,
            &mut rec,
            &corpus(&["Tyrant", "tyrant"]),
            &[],
            &options,
        );

        assert_eq!(rec.message(), vec![Some("Tyrant.")]);
        assert_eq!(report.filled.len(), 1);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].kept, "Tyrant.");
        assert_eq!(report.collisions[0].rejected, "tyrant.");
    }

    #[test]
    fn test_corpus_expansion_disabled() {
        let t = targets(&["tyrant."]);
        let mut rec = Reconstruction::unresolved_from(&t);
        let options = GapCloserOptions {
            expand_corpus: false,
            ..Default::default()
        };

        let report = run(&mut rec, &corpus(&["tyrant"]), &[], &options);

        assert_eq!(report.still_failing.len(), 1);
        assert_eq!(report.variants_tested, 0);
    }

    #[test]
    fn test_hint_exact_and_capitalized() {
        let t = targets(&["Moral", "fable"]);
        let mut rec = Reconstruction::unresolved_from(&t);
        let hints = [Hint::new(1, "moral"), Hint::new(2, "table").with_alternatives(["fable"])];
        let options = GapCloserOptions {
            expand_corpus: false,
            ..Default::default()
        };

        run(&mut rec, &[], &hints, &options);

        assert_eq!(rec.message(), vec![Some("Moral"), Some("fable")]);
        assert_eq!(rec.get(1).unwrap().base_word.as_deref(), Some("moral"));
        assert_eq!(rec.get(2).unwrap().base_word, None);
    }

    #[test]
    fn test_hint_typo_with_punctuation() {
        let t = targets(&["tyrant."]);
        let mut rec = Reconstruction::unresolved_from(&t);
        let hints = [Hint::new(1, "tyrrant")];
        let options = GapCloserOptions {
            edit_budget: 1,
            expand_corpus: false,
            ..Default::default()
        };

        let report = run(&mut rec, &[], &hints, &options);

        assert_eq!(rec.message(), vec![Some("tyrant.")]);
        assert_eq!(report.filled[0].base_word, "tyrrant");
        assert_eq!(report.filled[0].resolved_by, ResolvedBy::HintVariant);
    }

    #[test]
    fn test_hint_curly_apostrophe() {
        let t = targets(&["man\u{2019}s"]);
        let mut rec = Reconstruction::unresolved_from(&t);
        let options = GapCloserOptions {
            expand_corpus: false,
            ..Default::default()
        };

        run(&mut rec, &[], &[Hint::new(1, "man's")], &options);

        assert_eq!(rec.message(), vec![Some("man\u{2019}s")]);
    }

    #[test]
    fn test_hint_out_of_budget_stays_unresolved() {
        let t = targets(&["tyrant"]);
        let mut rec = Reconstruction::unresolved_from(&t);
        let hints = [Hint::new(1, "tirrant"), Hint::new(9, "ghost")];
        let options = GapCloserOptions {
            edit_budget: 1,
            expand_corpus: false,
            ..Default::default()
        };

        let report = run(&mut rec, &[], &hints, &options);

        assert_eq!(report.still_failing.len(), 1);
        assert_eq!(report.still_failing[0].line, 1);
        assert!(report.variants_tested > 0);
    }

    #[test]
    fn test_resolved_lines_are_not_touched() {
        let t = targets(&["the"]);
        let mut rec = Reconstruction::unresolved_from(&t);
        rec.resolve(1, "the", ResolvedBy::Lookup, None);

        let report = run(&mut rec, &corpus(&["the"]), &[Hint::new(1, "the")], &GapCloserOptions::default());

        assert!(report.filled.is_empty());
        assert_eq!(rec.get(1).unwrap().resolved_by, Some(ResolvedBy::Lookup));
    }
}
