//! Candidate corpus
//!
//! The corpus is an ordered, de-duplicated list of words. Its iteration
//! order is stable across runs so that collision resolution in the lookup
//! table is deterministic.

use std::collections::HashSet;

/// Ordered set of candidate words
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    words: Vec<String>,
}

impl Corpus {
    /// Build a corpus from raw entries
    ///
    /// Entries are trimmed; empty entries are dropped; later duplicates are
    /// dropped in favour of the first occurrence.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .filter_map(|w| {
                let w = w.as_ref().trim();
                (!w.is_empty()).then(|| w.to_string())
            })
            .filter(|w| seen.insert(w.clone()))
            .collect();

        Self { words }
    }

    /// Append the lowercase form of every word
    ///
    /// The result lists all original words first, then the lowercase forms
    /// that were not already present. Applying it twice changes nothing.
    pub fn with_lowercase(&self) -> Self {
        let lower = self.words.iter().map(|w| w.to_lowercase());
        Self::from_words(self.words.iter().cloned().chain(lower))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
