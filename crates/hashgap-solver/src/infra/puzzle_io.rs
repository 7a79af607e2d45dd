//! Puzzle file I/O

use crate::domain::target::{PuzzleError, TargetSet, parse_puzzle};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load a puzzle file (one hex digest per line)
pub fn load_puzzle(path: impl AsRef<Path>) -> Result<TargetSet, PuzzleError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PuzzleError::NotFound(path.to_path_buf()),
        _ => PuzzleError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_puzzle(&text)
}
