//! Digest oracle
//!
//! This module wraps the one-way hash behind the `DigestOracle` trait and
//! provides the fixed-size `Digest` value compared during every search.

use crate::constants::{DIGEST_BYTES, DIGEST_HEX_LEN};
use serde::{Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "hashmap-lookup")]
pub type DigestSet = rustc_hash::FxHashSet<Digest>;

#[cfg(feature = "hashmap-lookup")]
pub type DigestMap<V> = rustc_hash::FxHashMap<Digest, V>;

#[cfg(not(feature = "hashmap-lookup"))]
pub type DigestSet = std::collections::HashSet<Digest>;

#[cfg(not(feature = "hashmap-lookup"))]
pub type DigestMap<V> = std::collections::HashMap<Digest, V>;

/// A 32-byte digest, displayed as 64 lowercase hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_BYTES]);

impl Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_BYTES] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from its hex form
    ///
    /// Only the canonical form is accepted: exactly 64 characters, digits and
    /// lowercase `a`-`f`.
    pub fn from_hex(text: &str) -> Result<Self, DigestParseError> {
        if text.len() != DIGEST_HEX_LEN {
            return Err(DigestParseError::Length(text.chars().count()));
        }
        if let Some(c) = text
            .chars()
            .find(|c| !(c.is_ascii_digit() || ('a'..='f').contains(c)))
        {
            return Err(DigestParseError::Character(c));
        }

        let mut bytes = [0u8; DIGEST_BYTES];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| DigestParseError::Hex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Rejected digest text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestParseError {
    #[error("expected 64 hex characters, found {0}")]
    Length(usize),
    #[error("invalid character {0:?} (digests are lowercase hex)")]
    Character(char),
    #[error("invalid hex: {0}")]
    Hex(String),
}

/// One-way function mapping candidate bytes to a digest
///
/// Implementations must be pure: the same input always yields the same digest.
pub trait DigestOracle: Sync {
    /// Digest the concatenation of `parts`
    fn digest_parts(&self, parts: &[&[u8]]) -> Digest;

    /// Digest a single byte string
    fn digest(&self, input: &[u8]) -> Digest {
        self.digest_parts(&[input])
    }
}

/// SHA-256 oracle
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Oracle;

impl DigestOracle for Sha256Oracle {
    #[inline]
    fn digest_parts(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Digest(hasher.finalize().into())
    }
}

/// Hex SHA-256 of `input`
pub fn sha256_hex(input: &[u8]) -> String {
    Sha256Oracle.digest(input).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        let first = sha256_hex(b"5262love");
        let second = sha256_hex(b"5262love");
        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_HEX_LEN);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_digest_parts_matches_concatenation() {
        let oracle = Sha256Oracle;
        assert_eq!(
            oracle.digest_parts(&[b"5262", b"love"]),
            oracle.digest(b"5262love")
        );
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = Sha256Oracle.digest(b"the");
        assert_eq!(Digest::from_hex(&digest.to_hex()).unwrap(), digest);
        assert_eq!(digest.to_string(), digest.to_hex());
    }

    #[test]
    fn test_from_hex_rejects_uppercase() {
        let upper = sha256_hex(b"abc").to_uppercase();
        assert!(matches!(
            Digest::from_hex(&upper),
            Err(DigestParseError::Character('B'))
        ));
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert_eq!(Digest::from_hex("abcd"), Err(DigestParseError::Length(4)));
    }
}
