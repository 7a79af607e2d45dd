//! Straggler hint files
//!
//! A hint names the word expected at a puzzle line, optionally followed by
//! alternative words to try there:
//!
//! ```text
//! # line  word       alternatives...
//! 24      moral      immoral amoral morale morals
//! 40      tyrant     leader ruler king
//! 51      man's
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Expected word (and alternatives) for one puzzle line
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hint {
    /// 1-indexed puzzle line
    pub line: usize,
    pub word: String,
    pub alternatives: Vec<String>,
}

impl Hint {
    pub fn new(line: usize, word: impl Into<String>) -> Self {
        Self {
            line,
            word: word.into(),
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives.extend(alternatives.into_iter().map(Into::into));
        self
    }

    /// The hinted word followed by its alternatives
    pub fn bases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.word.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

#[derive(Debug, Error)]
pub enum HintsError {
    #[error("hints file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("hints line {line_no}: {reason}")]
    Malformed { line_no: usize, reason: String },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parse hint text
///
/// Blank lines and lines starting with `#` are ignored. Each other line is
/// `<line> <word> [alternative ...]`, whitespace separated.
pub fn parse_hints(text: &str) -> Result<Vec<Hint>, HintsError> {
    let mut hints = Vec::new();
    let mut seen = HashSet::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let mut parts = content.split_whitespace();
        let malformed = |reason: String| HintsError::Malformed { line_no, reason };

        let line: usize = parts
            .next()
            .and_then(|p| p.parse().ok())
            .filter(|&l| l > 0)
            .ok_or_else(|| malformed("expected a positive line number".into()))?;
        let word = parts
            .next()
            .ok_or_else(|| malformed(format!("missing word for line {}", line)))?;
        if !seen.insert(line) {
            return Err(malformed(format!("duplicate hint for line {}", line)));
        }

        hints.push(Hint::new(line, word).with_alternatives(parts));
    }

    Ok(hints)
}

/// Load a hints file
pub fn load_hints(path: impl AsRef<Path>) -> Result<Vec<Hint>, HintsError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => HintsError::NotFound(path.to_path_buf()),
        _ => HintsError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_hints(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hints() {
        let text = "# stragglers\n\n24 moral immoral amoral morale\n40\ttyrant\n  51 man's  \n";
        let hints = parse_hints(text).unwrap();

        assert_eq!(
            hints,
            vec![
                Hint::new(24, "moral").with_alternatives(["immoral", "amoral", "morale"]),
                Hint::new(40, "tyrant"),
                Hint::new(51, "man's"),
            ]
        );
        assert_eq!(
            hints[0].bases().collect::<Vec<_>>(),
            vec!["moral", "immoral", "amoral", "morale"]
        );
    }

    #[test]
    fn test_parse_hints_rejects_bad_line_number() {
        assert!(matches!(
            parse_hints("zero moral"),
            Err(HintsError::Malformed { line_no: 1, .. })
        ));
        assert!(matches!(
            parse_hints("\n0 moral"),
            Err(HintsError::Malformed { line_no: 2, .. })
        ));
    }

    #[test]
    fn test_parse_hints_rejects_missing_word_and_duplicates() {
        assert!(matches!(parse_hints("7"), Err(HintsError::Malformed { .. })));
        assert!(matches!(
            parse_hints("7 a\n7 b"),
            Err(HintsError::Malformed { line_no: 2, .. })
        ));
    }

    #[test]
    fn test_load_missing_hints() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_hints(dir.path().join("hints.txt")),
            Err(HintsError::NotFound(_))
        ));
    }
}
