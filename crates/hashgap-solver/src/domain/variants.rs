//! Typo and variant generation
//!
//! Two families of variants are produced from a base word:
//! - edit-distance neighbours (deletion, transposition, substitution,
//!   insertion over a fixed alphabet)
//! - surface variants: case forms crossed with punctuation suffixes, plus the
//!   curly-apostrophe spelling of anything containing a straight apostrophe

use crate::constants::{
    CURLY_APOSTROPHE, DEFAULT_SUFFIXES, EDIT_ALPHABET, MAX_EDIT_BUDGET, STRAIGHT_APOSTROPHE,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Edit-distance neighbours
// =============================================================================

/// Every single-edit neighbour of `word`, duplicates included
///
/// For a word of `L` characters over an alphabet of `A` letters this yields
/// `L` deletions, `L - 1` transpositions, `L * A` substitutions and
/// `(L + 1) * A` insertions, in that order. Substituting a character with
/// itself is kept, so the word itself is among the results.
pub fn edit_candidates_1(word: &str, alphabet: &[char]) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let a = alphabet.len();
    let mut out = Vec::with_capacity(n + n.saturating_sub(1) + n * a + (n + 1) * a);

    for i in 0..n {
        out.push(chars[..i].iter().chain(&chars[i + 1..]).collect());
    }

    for i in 0..n.saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        out.push(swapped.into_iter().collect());
    }

    for i in 0..n {
        for &c in alphabet {
            out.push(
                chars[..i]
                    .iter()
                    .chain(std::iter::once(&c))
                    .chain(&chars[i + 1..])
                    .collect(),
            );
        }
    }

    for i in 0..=n {
        for &c in alphabet {
            out.push(
                chars[..i]
                    .iter()
                    .chain(std::iter::once(&c))
                    .chain(&chars[i..])
                    .collect(),
            );
        }
    }

    out
}

/// The default lowercase ASCII edit alphabet
pub fn default_alphabet() -> Vec<char> {
    EDIT_ALPHABET.chars().collect()
}

/// Distinct strings within one edit of `word`
pub fn edits_within_1(word: &str) -> HashSet<String> {
    edit_candidates_1(word, &default_alphabet())
        .into_iter()
        .collect()
}

/// Distinct strings within two edits of `word`
///
/// This is the one-edit set of every one-edit neighbour, unioned with the
/// one-edit set itself. For common English word lengths it holds tens of
/// thousands of strings.
pub fn edits_within_2(word: &str) -> HashSet<String> {
    let alphabet = default_alphabet();
    let first = edits_within_1(word);

    let mut all = HashSet::with_capacity(first.len() * (first.len() / 2).max(1));
    for neighbour in &first {
        all.extend(edit_candidates_1(neighbour, &alphabet));
    }
    all.extend(first);
    all
}

// =============================================================================
// Surface variants (case and punctuation)
// =============================================================================

/// Case form applied to a word before suffixing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseVariant {
    AsIs,
    Lower,
    Capitalized,
}

impl CaseVariant {
    pub const ALL: [CaseVariant; 3] = [Self::AsIs, Self::Lower, Self::Capitalized];

    pub fn apply(self, word: &str) -> String {
        match self {
            Self::AsIs => word.to_string(),
            Self::Lower => word.to_lowercase(),
            Self::Capitalized => capitalize(word),
        }
    }
}

impl fmt::Display for CaseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AsIs => "as-is",
            Self::Lower => "lower",
            Self::Capitalized => "capitalized",
        })
    }
}

impl FromStr for CaseVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "as-is" | "asis" | "as_is" => Ok(Self::AsIs),
            "lower" | "lowercase" => Ok(Self::Lower),
            "capitalized" | "capitalize" | "cap" => Ok(Self::Capitalized),
            other => Err(format!("unknown case variant '{}'", other)),
        }
    }
}

/// First character uppercased, the rest lowercased
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Suffix and case sets used to expand a word into surface variants
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariantStyle {
    suffixes: Vec<String>,
    cases: Vec<CaseVariant>,
}

impl Default for VariantStyle {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            cases: CaseVariant::ALL.to_vec(),
        }
    }
}

impl VariantStyle {
    pub fn new(suffixes: Vec<String>, cases: Vec<CaseVariant>) -> Self {
        Self { suffixes, cases }
    }

    /// Case forms only, no punctuation
    pub fn bare(cases: Vec<CaseVariant>) -> Self {
        Self::new(vec![String::new()], cases)
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn cases(&self) -> &[CaseVariant] {
        &self.cases
    }

    /// Distinct surface variants of `word`, in case-major, suffix-minor order
    ///
    /// Each variant containing a straight apostrophe is followed by its
    /// curly-apostrophe spelling.
    pub fn expand(&self, word: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.cases.len() * self.suffixes.len() * 2);
        let mut push = |v: String| {
            if !out.contains(&v) {
                out.push(v);
            }
        };

        for case in &self.cases {
            let base = case.apply(word);
            for suffix in &self.suffixes {
                let variant = format!("{}{}", base, suffix);
                if variant.contains(STRAIGHT_APOSTROPHE) {
                    let curly = variant.replace(STRAIGHT_APOSTROPHE, &CURLY_APOSTROPHE.to_string());
                    push(variant);
                    push(curly);
                } else {
                    push(variant);
                }
            }
        }

        out
    }
}
