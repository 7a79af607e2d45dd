//! Target set
//!
//! The puzzle is an ordered list of digests, one per word of the hidden
//! message. Line order is message order and duplicates are meaningful.

use crate::domain::digest::{Digest, DigestParseError, DigestSet};
use std::path::PathBuf;
use thiserror::Error;

/// Ordered target digests with a membership index
#[derive(Clone, Debug, Default)]
pub struct TargetSet {
    digests: Vec<Digest>,
    members: DigestSet,
}

impl TargetSet {
    pub fn new(digests: Vec<Digest>) -> Self {
        let members = digests.iter().copied().collect();
        Self { digests, members }
    }

    /// Number of positions (lines)
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Number of distinct digests
    pub fn distinct_len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn contains(&self, digest: &Digest) -> bool {
        self.members.contains(digest)
    }

    /// Digest at a 1-indexed line
    pub fn get(&self, line: usize) -> Option<&Digest> {
        line.checked_sub(1).and_then(|i| self.digests.get(i))
    }

    /// `(line, digest)` pairs in message order, lines 1-indexed
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Digest)> {
        self.digests.iter().enumerate().map(|(i, d)| (i + 1, d))
    }

    /// First 1-indexed line holding `digest`
    pub fn first_line(&self, digest: &Digest) -> Option<usize> {
        self.digests.iter().position(|d| d == digest).map(|i| i + 1)
    }
}

/// Parse puzzle text: one hex digest per line
///
/// Surrounding whitespace is stripped from each line. Trailing blank lines
/// are ignored; any other line that is not a canonical digest is rejected
/// with its 1-indexed line number.
pub fn parse_puzzle(text: &str) -> Result<TargetSet, PuzzleError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let used = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |last| last + 1);

    let digests = lines[..used]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            Digest::from_hex(line).map_err(|source| PuzzleError::InvalidDigest {
                line: i + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TargetSet::new(digests))
}

/// Puzzle loading errors
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("puzzle file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("line {line}: {source}")]
    InvalidDigest {
        line: usize,
        source: DigestParseError,
    },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digest::sha256_hex;

    fn puzzle_text(words: &[&str]) -> String {
        words
            .iter()
            .map(|w| sha256_hex(format!("5262{}", w).as_bytes()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        let text = puzzle_text(&["as", "you", "wish", "as"]);
        let targets = parse_puzzle(&text).unwrap();

        assert_eq!(targets.len(), 4);
        assert_eq!(targets.distinct_len(), 3);
        assert_eq!(targets.get(1), targets.get(4));
        assert_eq!(targets.first_line(targets.get(4).unwrap()), Some(1));
        assert_eq!(targets.get(0), None);
        assert_eq!(targets.get(5), None);
    }

    #[test]
    fn test_parse_strips_whitespace_and_trailing_blank_lines() {
        let text = format!("{}  \r\n{}\n\n\n", sha256_hex(b"a"), sha256_hex(b"b"));
        let targets = parse_puzzle(&text).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.get(1).unwrap().to_hex(), sha256_hex(b"a"));
    }

    #[test]
    fn test_parse_rejects_interior_blank_line() {
        let text = format!("{}\n\n{}\n", sha256_hex(b"a"), sha256_hex(b"b"));
        let err = parse_puzzle(&text).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidDigest { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_digest() {
        let text = format!("{}\nnot-a-digest\n", sha256_hex(b"a"));
        let err = parse_puzzle(&text).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidDigest { line: 2, .. }));
    }

    #[test]
    fn test_parse_empty_puzzle() {
        let targets = parse_puzzle("").unwrap();
        assert!(targets.is_empty());
        assert_eq!(targets.iter().count(), 0);
    }
}
