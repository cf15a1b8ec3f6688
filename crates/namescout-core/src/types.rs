//! Shared types used across the Namescout workspace.
//!
//! This module defines the candidate newtype, the rules that decide which
//! strings are valid candidates, and the outcome vocabulary of a probe.

use crate::error::NamescoutError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default alphabet: lowercase letters, digits, `.` and `_`.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789._";

/// Newtype for a candidate identifier.
///
/// A `Candidate` carries no validation of its own; whether it belongs to the
/// enumerated space is decided by [`CandidateRules`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    /// Wrap a string as a candidate.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ordered set of characters candidates are drawn from.
///
/// The position of a character in the alphabet is its sort key during
/// enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a string, preserving character order.
    ///
    /// # Errors
    /// Returns error if the alphabet is empty or repeats a character.
    pub fn new(chars: &str) -> Result<Self, NamescoutError> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(NamescoutError::Validation(
                "alphabet must contain at least one character".to_string(),
            ));
        }

        for (i, c) in chars.iter().enumerate() {
            if chars[..i].contains(c) {
                return Err(NamescoutError::Validation(format!(
                    "alphabet repeats character '{c}'"
                )));
            }
        }

        Ok(Self { chars })
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; an alphabet is never empty once constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// Characters in enumeration order.
    #[must_use]
    pub fn as_chars(&self) -> &[char] {
        &self.chars
    }

    /// Index of `c`, or `None` if it is not part of the alphabet.
    #[must_use]
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.chars.iter().position(|&x| x == c)
    }

    /// Whether `c` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            chars: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

/// Validity rules for candidates: alphabet plus length bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRules {
    alphabet: Alphabet,
    min_len: usize,
    max_len: usize,
}

impl CandidateRules {
    /// Create a rule set.
    ///
    /// # Errors
    /// Returns error if `min_len` is zero or greater than `max_len`.
    pub fn new(alphabet: Alphabet, min_len: usize, max_len: usize) -> Result<Self, NamescoutError> {
        if min_len == 0 {
            return Err(NamescoutError::Validation(
                "minimum length must be at least 1".to_string(),
            ));
        }
        if min_len > max_len {
            return Err(NamescoutError::Validation(format!(
                "minimum length {min_len} exceeds maximum length {max_len}"
            )));
        }

        Ok(Self {
            alphabet,
            min_len,
            max_len,
        })
    }

    /// The alphabet candidates are drawn from.
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Shortest candidate length.
    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Longest candidate length.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Check a string against the rules.
    ///
    /// A valid candidate has a length within bounds, uses only alphabet
    /// characters, does not start or end with `.` and never contains `..`.
    #[must_use]
    pub fn is_valid(&self, value: &str) -> bool {
        let len = value.chars().count();
        if len < self.min_len || len > self.max_len {
            return false;
        }
        if value.starts_with('.') || value.ends_with('.') || value.contains("..") {
            return false;
        }
        value.chars().all(|c| self.alphabet.contains(c))
    }
}

impl Default for CandidateRules {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            min_len: 1,
            max_len: 4,
        }
    }
}

/// Classification result of probing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The identifier is free (remote answered not-found)
    Available,
    /// The identifier is in use (remote answered found)
    Taken,
    /// The remote refused or rate limited the request
    Blocked,
    /// The remote answered with an unexpected status
    Unknown,
    /// The request never completed (timeout, connection, DNS)
    Error,
}

impl Outcome {
    /// Whether this outcome records a discovery.
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "available",
            Self::Taken => "taken",
            Self::Blocked => "blocked",
            Self::Unknown => "unknown",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(alphabet: &str, min_len: usize, max_len: usize) -> CandidateRules {
        CandidateRules::new(Alphabet::new(alphabet).expect("valid alphabet"), min_len, max_len)
            .expect("valid rules")
    }

    #[test]
    fn test_dot_placement_rejected() {
        let rules = CandidateRules::default();
        assert!(!rules.is_valid("a."));
        assert!(!rules.is_valid("..ab"));
        assert!(!rules.is_valid(".ab"));
        assert!(!rules.is_valid("ab."));
        assert!(!rules.is_valid("a..b"));
        assert!(!rules.is_valid("."));
    }

    #[test]
    fn test_valid_candidates_accepted() {
        let rules = CandidateRules::default();
        assert!(rules.is_valid("a_1"));
        assert!(rules.is_valid("0.a"));
        assert!(rules.is_valid("_"));
        assert!(rules.is_valid("a.b"));
    }

    #[test]
    fn test_length_and_alphabet_enforced() {
        let rules = rules("ab", 2, 3);
        assert!(!rules.is_valid("a"));
        assert!(rules.is_valid("ab"));
        assert!(rules.is_valid("bab"));
        assert!(!rules.is_valid("abab"));
        assert!(!rules.is_valid("ac"));
        assert!(!rules.is_valid("AB"));
    }

    #[test]
    fn test_alphabet_rejects_duplicates_and_empty() {
        assert!(Alphabet::new("").is_err());
        assert!(Alphabet::new("abca").is_err());

        let alphabet = Alphabet::new("xyz").expect("valid alphabet");
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.index_of('z'), Some(2));
        assert_eq!(alphabet.index_of('a'), None);
        assert_eq!(alphabet.char_at(1), Some('y'));
    }

    #[test]
    fn test_rules_reject_bad_lengths() {
        assert!(CandidateRules::new(Alphabet::default(), 0, 3).is_err());
        assert!(CandidateRules::new(Alphabet::default(), 4, 3).is_err());
        assert!(CandidateRules::new(Alphabet::default(), 3, 3).is_ok());
    }

    #[test]
    fn test_outcome_display_and_serde() {
        assert_eq!(Outcome::Available.to_string(), "available");
        assert_eq!(Outcome::Blocked.to_string(), "blocked");
        assert!(Outcome::Available.is_available());
        assert!(!Outcome::Taken.is_available());

        let json = serde_json::to_string(&Outcome::Unknown).expect("serialize outcome");
        assert_eq!(json, "\"unknown\"");
    }

    #[test]
    fn test_candidate_serializes_as_plain_string() {
        let candidate = Candidate::new("a_1");
        let json = serde_json::to_string(&candidate).expect("serialize candidate");
        assert_eq!(json, "\"a_1\"");
        assert_eq!(candidate.char_len(), 3);
        assert_eq!(candidate.to_string(), "a_1");
    }
}
