//! Resolution results
//!
//! `Reconstruction` tracks, per puzzle line, whether the word has been
//! recovered and by which phase. It is the structured form of the decoded
//! message.

use crate::domain::candidate::ConcatOrder;
use crate::domain::digest::{Digest, DigestOracle};
use crate::domain::target::TargetSet;
use serde::Serialize;

/// Placeholder printed for a line that is not resolved yet
pub const UNRESOLVED_MARKER: &str = ">>> [MISSING/MISSPELLED] <<<";

/// A (key, word) pair reproducing a target digest
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub key: String,
    pub word: String,
    pub digest: Digest,
}

impl MatchRecord {
    /// Recompute the digest and compare
    pub fn verify<O: DigestOracle + ?Sized>(&self, oracle: &O, order: ConcatOrder) -> bool {
        order.digest(oracle, &self.key, &self.word) == self.digest
    }
}

/// Which step recovered a line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    /// Matched during the keyspace scan
    KeySearch,
    /// Found in the corpus lookup table
    Lookup,
    /// Punctuation/case variant of a corpus word
    CorpusVariant,
    /// Hinted word, or one of its typo/punctuation variants
    HintVariant,
}

/// State of one puzzle line
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// 1-indexed line number
    pub line: usize,
    pub digest: Digest,
    pub word: Option<String>,
    pub resolved_by: Option<ResolvedBy>,
    /// Word the variant was generated from, when it differs from `word`
    pub base_word: Option<String>,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        self.word.is_some()
    }
}

/// A line still waiting for a word
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub line: usize,
    pub digest: Digest,
}

/// Per-line resolution of a whole puzzle, in message order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Reconstruction {
    positions: Vec<Resolution>,
}

impl Reconstruction {
    /// Every line of `targets`, all unresolved
    pub fn unresolved_from(targets: &TargetSet) -> Self {
        let positions = targets
            .iter()
            .map(|(line, digest)| Resolution {
                line,
                digest: *digest,
                word: None,
                resolved_by: None,
                base_word: None,
            })
            .collect();
        Self { positions }
    }

    pub fn positions(&self) -> &[Resolution] {
        &self.positions
    }

    pub fn get(&self, line: usize) -> Option<&Resolution> {
        line.checked_sub(1).and_then(|i| self.positions.get(i))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolve one line; returns false if it was already resolved or does not exist
    pub fn resolve(
        &mut self,
        line: usize,
        word: &str,
        by: ResolvedBy,
        base_word: Option<&str>,
    ) -> bool {
        let Some(position) = line.checked_sub(1).and_then(|i| self.positions.get_mut(i)) else {
            return false;
        };
        if position.is_resolved() {
            return false;
        }

        position.word = Some(word.to_string());
        position.resolved_by = Some(by);
        position.base_word = base_word.filter(|b| *b != word).map(str::to_string);
        true
    }

    /// Resolve every unresolved line holding `digest`; returns the lines changed
    pub fn resolve_digest(
        &mut self,
        digest: &Digest,
        word: &str,
        by: ResolvedBy,
        base_word: Option<&str>,
    ) -> Vec<usize> {
        let lines: Vec<usize> = self
            .positions
            .iter()
            .filter(|p| !p.is_resolved() && p.digest == *digest)
            .map(|p| p.line)
            .collect();

        for &line in &lines {
            self.resolve(line, word, by, base_word);
        }
        lines
    }

    /// Lines without a word, in order
    pub fn unresolved(&self) -> Vec<Unresolved> {
        self.positions
            .iter()
            .filter(|p| !p.is_resolved())
            .map(|p| Unresolved {
                line: p.line,
                digest: p.digest,
            })
            .collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_resolved()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.positions.iter().all(Resolution::is_resolved)
    }

    /// The message as a word-or-nothing sequence
    pub fn message(&self) -> Vec<Option<&str>> {
        self.positions.iter().map(|p| p.word.as_deref()).collect()
    }

    /// One display line per position: `Line N: word` or the unresolved marker
    pub fn render_lines(&self) -> Vec<String> {
        self.positions
            .iter()
            .map(|p| match &p.word {
                Some(word) => format!("Line {}: {}", p.line, word),
                None => format!("Line {}: {}", p.line, UNRESOLVED_MARKER),
            })
            .collect()
    }

    /// The message joined with spaces, `____` standing in for gaps
    pub fn sentence(&self) -> String {
        self.message()
            .into_iter()
            .map(|w| w.unwrap_or("____"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
