//! Top-level error type
//!
//! Only configuration-class failures surface here. Everything else
//! (bad corpus rows, collisions, an exhausted keyspace) is handled where it
//! happens and reported as data.

use crate::app::config::ConfigError;
use crate::domain::target::PuzzleError;
use crate::infra::dictionary_io::DictionaryError;
use crate::infra::hints_io::HintsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("puzzle error: {0}")]
    Puzzle(#[from] PuzzleError),

    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("hints error: {0}")]
    Hints(#[from] HintsError),
}
