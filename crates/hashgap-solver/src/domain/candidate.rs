//! Candidate construction
//!
//! A candidate is the byte string fed to the digest oracle: the key and a
//! word concatenated in a fixed order.

use crate::domain::digest::{Digest, DigestOracle};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Order in which key and word are concatenated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatOrder {
    /// `key || word`
    #[default]
    KeyFirst,
    /// `word || key`
    WordFirst,
}

impl ConcatOrder {
    pub fn opposite(self) -> Self {
        match self {
            Self::KeyFirst => Self::WordFirst,
            Self::WordFirst => Self::KeyFirst,
        }
    }

    /// The candidate string for `key` and `word`
    pub fn concat(self, key: &str, word: &str) -> String {
        match self {
            Self::KeyFirst => format!("{key}{word}"),
            Self::WordFirst => format!("{word}{key}"),
        }
    }

    /// Digest the candidate without building it
    #[inline]
    pub fn digest<O: DigestOracle + ?Sized>(self, oracle: &O, key: &str, word: &str) -> Digest {
        match self {
            Self::KeyFirst => oracle.digest_parts(&[key.as_bytes(), word.as_bytes()]),
            Self::WordFirst => oracle.digest_parts(&[word.as_bytes(), key.as_bytes()]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeyFirst => "key_first",
            Self::WordFirst => "word_first",
        }
    }
}

impl fmt::Display for ConcatOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConcatOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key_first" | "key-first" => Ok(Self::KeyFirst),
            "word_first" | "word-first" => Ok(Self::WordFirst),
            other => Err(format!(
                "unknown concatenation order '{}' (expected key_first or word_first)",
                other
            )),
        }
    }
}
