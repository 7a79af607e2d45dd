//! Digest lookup table
//!
//! Maps digest → source word for one fixed key. The first word inserted for a
//! digest wins; a later, different word for the same digest is recorded as a
//! collision and logged.

use crate::domain::digest::{Digest, DigestMap};
use serde::Serialize;
use std::collections::hash_map::Entry;
use tracing::warn;

/// Two distinct words producing the same digest under the same key
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub digest: Digest,
    /// Word kept in the table (inserted first)
    pub kept: String,
    /// Word that was rejected
    pub rejected: String,
}

/// Result of a single insertion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Same digest and same word already present
    Duplicate,
    Collision,
}

#[derive(Clone, Debug, Default)]
pub struct LookupTable {
    entries: DigestMap<String>,
    collisions: Vec<Collision>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DigestMap::<String>::with_capacity_and_hasher(capacity, Default::default()),
            collisions: Vec::new(),
        }
    }

    pub fn insert(&mut self, digest: Digest, word: &str) -> InsertOutcome {
        match self.entries.entry(digest) {
            Entry::Vacant(slot) => {
                slot.insert(word.to_string());
                InsertOutcome::Inserted
            }
            Entry::Occupied(slot) if slot.get() == word => InsertOutcome::Duplicate,
            Entry::Occupied(slot) => {
                warn!(
                    digest = %digest,
                    kept = %slot.get(),
                    rejected = %word,
                    "hash collision: keeping the first word"
                );
                self.collisions.push(Collision {
                    digest,
                    kept: slot.get().clone(),
                    rejected: word.to_string(),
                });
                InsertOutcome::Collision
            }
        }
    }

    #[inline]
    pub fn get(&self, digest: &Digest) -> Option<&str> {
        self.entries.get(digest).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}
