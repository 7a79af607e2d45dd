//! hashgap-solver - Keyed SHA-256 digest search
//!
//! This crate provides functionality to:
//! - Recover a fixed-width numeric key from `SHA-256(key || word)` digests
//! - Decode an ordered puzzle of digests into words once the key is known
//! - Close the remaining gaps with punctuation, case and typo variants

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export commonly used types
pub use app::config::{ConfigError, Phases, SolverConfig};
pub use app::pipeline::{SolveInputs, SolveReport, load_inputs, run, run_with};
pub use constants::*;
pub use domain::candidate::ConcatOrder;
pub use domain::corpus::Corpus;
pub use domain::digest::{Digest, DigestOracle, Sha256Oracle, sha256_hex};
pub use domain::keyspace::KeySpace;
pub use domain::report::{MatchRecord, Reconstruction, Resolution, ResolvedBy, Unresolved};
pub use domain::target::TargetSet;
pub use error::SolverError;
