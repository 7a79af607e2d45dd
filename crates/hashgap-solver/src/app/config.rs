//! Solver configuration
//!
//! Every phase reads its parameters from a `SolverConfig` passed in by the
//! caller. Presets cover the two known puzzle sizes.

use crate::constants::{
    DEFAULT_WORD_COLUMN, EASY_KEY_WIDTH, EASY_KEYSPACE, HARD_KEY_WIDTH, HARD_KEYSPACE,
    HARD_PROBE_WORD, MAX_EDIT_BUDGET, MAX_KEY_WIDTH,
};
use crate::domain::candidate::ConcatOrder;
use crate::domain::keyspace::KeySpace;
use crate::domain::variants::{CaseVariant, VariantStyle};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Which phases of the pipeline run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Phases {
    /// Phase 1: recover the key by scanning the keyspace
    pub find_key: bool,
    /// Phase 2: decode every line through the corpus lookup table
    pub lookup: bool,
    /// Phase 3: resolve the remaining lines with generated variants
    pub close_gaps: bool,
}

impl Default for Phases {
    fn default() -> Self {
        Self {
            find_key: true,
            lookup: true,
            close_gaps: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SolverConfig {
    pub puzzle_path: PathBuf,
    pub dictionary_path: PathBuf,
    /// Header of the dictionary column holding words
    pub word_column: String,
    pub key_width: usize,
    /// Keys `0..keyspace_size` are searched
    pub keyspace_size: u64,
    /// Known key; Phase 1 is skipped when set
    pub known_key: Option<String>,
    /// Single word used for the Phase 1 fast path instead of the whole corpus
    pub probe_word: Option<String>,
    pub order: ConcatOrder,
    /// Retry Phase 1 with the opposite order when nothing is found
    pub try_both_orders: bool,
    /// Number of keyspace partitions and worker threads
    pub workers: usize,
    /// Wall-clock limit for Phase 1
    pub timeout: Option<Duration>,
    /// Maximum edit distance for hinted words (0, 1 or 2)
    pub edit_budget: u8,
    pub suffixes: Vec<String>,
    pub case_variants: Vec<CaseVariant>,
    /// Phase 3 also tries suffix/case variants of every corpus word
    pub expand_corpus_punctuation: bool,
    pub hints_path: Option<PathBuf>,
    pub phases: Phases,
}

impl SolverConfig {
    /// Defaults for a 4-digit key
    pub fn new(puzzle_path: impl Into<PathBuf>, dictionary_path: impl Into<PathBuf>) -> Self {
        let style = VariantStyle::default();
        Self {
            puzzle_path: puzzle_path.into(),
            dictionary_path: dictionary_path.into(),
            word_column: DEFAULT_WORD_COLUMN.to_string(),
            key_width: EASY_KEY_WIDTH,
            keyspace_size: EASY_KEYSPACE,
            known_key: None,
            probe_word: None,
            order: ConcatOrder::KeyFirst,
            try_both_orders: false,
            workers: default_workers(),
            timeout: None,
            edit_budget: MAX_EDIT_BUDGET,
            suffixes: style.suffixes().to_vec(),
            case_variants: style.cases().to_vec(),
            expand_corpus_punctuation: true,
            hints_path: None,
            phases: Phases::default(),
        }
    }

    /// The easy puzzle: 4-digit keys, full corpus scan
    pub fn easy(puzzle_path: impl Into<PathBuf>, dictionary_path: impl Into<PathBuf>) -> Self {
        Self::new(puzzle_path, dictionary_path)
    }

    /// The hard puzzle: 9-digit keys, probed with a single common word
    pub fn hard(puzzle_path: impl Into<PathBuf>, dictionary_path: impl Into<PathBuf>) -> Self {
        Self {
            key_width: HARD_KEY_WIDTH,
            keyspace_size: HARD_KEYSPACE,
            probe_word: Some(HARD_PROBE_WORD.to_string()),
            ..Self::new(puzzle_path, dictionary_path)
        }
    }

    pub fn keyspace(&self) -> KeySpace {
        KeySpace::new(self.keyspace_size, self.key_width)
    }

    pub fn variant_style(&self) -> VariantStyle {
        VariantStyle::new(self.suffixes.clone(), self.case_variants.clone())
    }

    /// Check the configuration before any work starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_width == 0 || self.key_width > MAX_KEY_WIDTH {
            return Err(ConfigError::InvalidKeyWidth(self.key_width));
        }
        if self.keyspace_size == 0 {
            return Err(ConfigError::EmptyKeyspace);
        }
        if let Some(full) = KeySpace::full(self.key_width)
            && self.keyspace_size > full.total()
        {
            return Err(ConfigError::KeyspaceTooLarge {
                size: self.keyspace_size,
                width: self.key_width,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.edit_budget > MAX_EDIT_BUDGET {
            return Err(ConfigError::InvalidEditBudget(self.edit_budget));
        }
        if self.case_variants.is_empty() {
            return Err(ConfigError::NoCaseVariants);
        }
        if let Some(key) = &self.known_key
            && (key.is_empty() || !key.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(ConfigError::InvalidKnownKey(key.clone()));
        }
        if let Some(word) = &self.probe_word
            && word.is_empty()
        {
            return Err(ConfigError::EmptyProbeWord);
        }
        if !self.phases.find_key && self.known_key.is_none() {
            return Err(ConfigError::MissingKey);
        }
        Ok(())
    }
}

/// Available parallelism, or 1 if it cannot be determined
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("key width must be between 1 and 19, got {0}")]
    InvalidKeyWidth(usize),

    #[error("keyspace is empty")]
    EmptyKeyspace,

    #[error("keyspace of {size} keys does not fit in {width} digits")]
    KeyspaceTooLarge { size: u64, width: usize },

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("edit budget must be 0, 1 or 2, got {0}")]
    InvalidEditBudget(u8),

    #[error("at least one case variant is required")]
    NoCaseVariants,

    #[error("known key must be decimal digits, got '{0}'")]
    InvalidKnownKey(String),

    #[error("probe word is empty")]
    EmptyProbeWord,

    #[error("the key search phase is disabled but no key was given")]
    MissingKey,
}
