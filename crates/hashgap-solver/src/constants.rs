//! Solver constants and puzzle presets

// =============================================================================
// Digest parameters
// =============================================================================

/// SHA-256 output size in bytes
pub const DIGEST_BYTES: usize = 32;

/// Length of a hex-encoded digest (64 lowercase characters)
pub const DIGEST_HEX_LEN: usize = DIGEST_BYTES * 2;

// =============================================================================
// Keyspace presets
// =============================================================================

/// Key width of the easy puzzle (`0000`..`9999`)
pub const EASY_KEY_WIDTH: usize = 4;

/// Keyspace size of the easy puzzle
pub const EASY_KEYSPACE: u64 = 10_000;

/// Key width of the hard puzzle (`000000000`..`999999999`)
pub const HARD_KEY_WIDTH: usize = 9;

/// Keyspace size of the hard puzzle
pub const HARD_KEYSPACE: u64 = 1_000_000_000;

/// Probe word used to recover the hard puzzle key
pub const HARD_PROBE_WORD: &str = "the";

/// Widest key whose full keyspace (10^width) still fits in a u64
pub const MAX_KEY_WIDTH: usize = 19;

// =============================================================================
// Variant generation
// =============================================================================

/// Alphabet used for substitutions and insertions
pub const EDIT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Largest supported edit distance
pub const MAX_EDIT_BUDGET: u8 = 2;

/// Punctuation suffixes tried after a word (the empty suffix keeps it bare)
pub const DEFAULT_SUFFIXES: [&str; 7] = ["", ".", ",", "?", "!", ":", ";"];

/// Straight apostrophe as typed
pub const STRAIGHT_APOSTROPHE: char = '\'';

/// Typographic apostrophe found in typeset source text
pub const CURLY_APOSTROPHE: char = '\u{2019}';

// =============================================================================
// Dictionary format
// =============================================================================

/// Header of the word column in dictionary CSV files
pub const DEFAULT_WORD_COLUMN: &str = "Word";

/// Cell values treated as missing when reading a dictionary
pub const MISSING_CELL_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// =============================================================================
// Scheduling
// =============================================================================

/// Digests computed by a worker between progress reports and stop/deadline checks
pub const CHECK_INTERVAL_DIGESTS: u64 = 1 << 14;
