//! Deterministic candidate enumeration.
//!
//! Candidates are ordered by length, then lexicographically by alphabet
//! index. The order never changes for a given [`CandidateRules`], so a single
//! remembered value is enough to resume a later run.

use namescout_core::{Candidate, CandidateRules};
use std::sync::{Mutex, PoisonError};

/// Cursor over the candidate space.
///
/// Internally a mixed-radix odometer: `digits[i]` is the alphabet index of
/// the character at position `i` of the next string to examine.
#[derive(Debug, Clone)]
pub struct CandidateSequence {
    rules: CandidateRules,
    length: usize,
    digits: Vec<usize>,
    exhausted: bool,
}

impl CandidateSequence {
    /// Start at the first valid candidate.
    #[must_use]
    pub fn new(rules: CandidateRules) -> Self {
        let length = rules.min_len();
        Self {
            rules,
            length,
            digits: vec![0; length],
            exhausted: false,
        }
    }

    /// Start right after `last`, or at the beginning when `last` is `None`.
    ///
    /// If `last` is not part of the ordering (for example the alphabet or
    /// length bounds changed between runs) nothing is skipped.
    #[must_use]
    pub fn resume_after(rules: CandidateRules, last: Option<&Candidate>) -> Self {
        let mut sequence = Self::new(rules);
        if let Some(last) = last {
            if !sequence.seek_past(last) {
                tracing::warn!(
                    "Checkpoint {} is not part of the current candidate space, starting over",
                    last
                );
            }
        }
        sequence
    }

    /// The rules this sequence enumerates.
    #[must_use]
    pub fn rules(&self) -> &CandidateRules {
        &self.rules
    }

    /// Position the odometer on `last` and step once past it.
    ///
    /// Decoding the value directly gives the same position a full replay up
    /// to `last` would reach.
    fn seek_past(&mut self, last: &Candidate) -> bool {
        if !self.rules.is_valid(last.as_str()) {
            return false;
        }

        let alphabet = self.rules.alphabet();
        let digits: Option<Vec<usize>> = last
            .as_str()
            .chars()
            .map(|c| alphabet.index_of(c))
            .collect();
        let Some(digits) = digits else {
            return false;
        };

        self.length = digits.len();
        self.digits = digits;
        self.advance();
        true
    }

    fn current(&self) -> String {
        let chars = self.rules.alphabet().as_chars();
        self.digits.iter().map(|&i| chars[i]).collect()
    }

    fn advance(&mut self) {
        let radix = self.rules.alphabet().len();
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < radix {
                return;
            }
            *digit = 0;
        }

        // Every position rolled over: move on to the next length
        self.length += 1;
        if self.length > self.rules.max_len() {
            self.exhausted = true;
        } else {
            self.digits = vec![0; self.length];
        }
    }
}

impl Iterator for CandidateSequence {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        while !self.exhausted {
            let value = self.current();
            self.advance();
            if self.rules.is_valid(&value) {
                return Some(Candidate::new(value));
            }
        }
        None
    }
}

/// A [`CandidateSequence`] that many workers pull from.
///
/// Every pull is serialized, so no candidate is handed out twice and none is
/// skipped.
#[derive(Debug)]
pub struct SharedSequence {
    inner: Mutex<CandidateSequence>,
}

impl SharedSequence {
    /// Wrap a sequence for shared use.
    #[must_use]
    pub fn new(sequence: CandidateSequence) -> Self {
        Self {
            inner: Mutex::new(sequence),
        }
    }

    /// Pull the next candidate, or `None` once the space is exhausted.
    pub fn pull(&self) -> Option<Candidate> {
        self.pull_with(|_| {})
    }

    /// Pull the next candidate and run `on_claim` while still holding the
    /// cursor lock.
    ///
    /// Anything recorded from `on_claim` observes candidates in enumeration
    /// order, even with many concurrent callers.
    pub fn pull_with<F>(&self, on_claim: F) -> Option<Candidate>
    where
        F: FnOnce(&Candidate),
    {
        let mut sequence = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let candidate = sequence.next()?;
        on_claim(&candidate);
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namescout_core::Alphabet;
    use std::collections::HashSet;

    fn rules(alphabet: &str, min_len: usize, max_len: usize) -> CandidateRules {
        CandidateRules::new(Alphabet::new(alphabet).expect("valid alphabet"), min_len, max_len)
            .expect("valid rules")
    }

    fn collect(rules: &CandidateRules) -> Vec<String> {
        CandidateSequence::new(rules.clone())
            .map(|c| c.as_str().to_string())
            .collect()
    }

    /// Every string over the alphabet with length in bounds, filtered by the
    /// rules, built without the odometer.
    fn brute_force(rules: &CandidateRules) -> HashSet<String> {
        let chars = rules.alphabet().as_chars();
        let mut all = HashSet::new();
        let mut frontier = vec![String::new()];
        for len in 1..=rules.max_len() {
            let mut next = Vec::new();
            for prefix in &frontier {
                for &c in chars {
                    let mut s = prefix.clone();
                    s.push(c);
                    next.push(s);
                }
            }
            if len >= rules.min_len() {
                all.extend(next.iter().filter(|s| rules.is_valid(s)).cloned());
            }
            frontier = next;
        }
        all
    }

    fn sort_key(rules: &CandidateRules, s: &str) -> (usize, Vec<usize>) {
        let alphabet = rules.alphabet();
        (
            s.chars().count(),
            s.chars()
                .map(|c| alphabet.index_of(c).expect("char in alphabet"))
                .collect(),
        )
    }

    #[test]
    fn test_small_alphabet_order() {
        let rules = rules("ab", 1, 2);
        assert_eq!(collect(&rules), vec!["a", "b", "aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn test_order_follows_alphabet_index_not_char_code() {
        let rules = rules("ba", 1, 2);
        assert_eq!(collect(&rules), vec!["b", "a", "bb", "ba", "ab", "aa"]);
    }

    #[test]
    fn test_each_valid_candidate_exactly_once_in_order() {
        let cases = [("a._", 1, 4), ("ab.", 2, 4), ("x.", 1, 5), ("0_.z", 3, 3)];
        for (alphabet, min_len, max_len) in cases {
            let rules = rules(alphabet, min_len, max_len);
            let produced = collect(&rules);

            let unique: HashSet<String> = produced.iter().cloned().collect();
            assert_eq!(unique.len(), produced.len(), "duplicates for {alphabet}");
            assert_eq!(unique, brute_force(&rules), "coverage for {alphabet}");

            for pair in produced.windows(2) {
                assert!(
                    sort_key(&rules, &pair[0]) < sort_key(&rules, &pair[1]),
                    "{} should come before {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_dotted_strings_filtered() {
        let rules = rules("a.", 1, 3);
        assert_eq!(collect(&rules), vec!["a", "aa", "aaa", "a.a"]);
    }

    #[test]
    fn test_resume_yields_exact_suffix() {
        let rules = rules("a._", 1, 3);
        let full = collect(&rules);

        for (k, last) in full.iter().enumerate() {
            let resumed: Vec<String> =
                CandidateSequence::resume_after(rules.clone(), Some(&Candidate::new(last.as_str())))
                    .map(|c| c.as_str().to_string())
                    .collect();
            assert_eq!(resumed, full[k + 1..], "resume after {last}");
        }
    }

    #[test]
    fn test_resume_after_none_starts_at_beginning() {
        let rules = rules("ab", 1, 2);
        let resumed: Vec<String> = CandidateSequence::resume_after(rules.clone(), None)
            .map(|c| c.as_str().to_string())
            .collect();
        assert_eq!(resumed, collect(&rules));
    }

    #[test]
    fn test_resume_after_unknown_value_skips_nothing() {
        let rules = rules("ab", 1, 2);
        let full = collect(&rules);

        for stale in ["abc", "zz", "aaa", "", "a.b"] {
            let resumed: Vec<String> =
                CandidateSequence::resume_after(rules.clone(), Some(&Candidate::new(stale)))
                    .map(|c| c.as_str().to_string())
                    .collect();
            assert_eq!(resumed, full, "stale checkpoint {stale:?}");
        }
    }

    #[test]
    fn test_resume_after_last_is_exhausted() {
        let rules = rules("ab", 1, 2);
        let mut resumed = CandidateSequence::resume_after(rules, Some(&Candidate::new("bb")));
        assert!(resumed.next().is_none());
        assert!(resumed.next().is_none());
    }

    #[test]
    fn test_concurrent_pulls_never_duplicate() {
        let rules = rules("abc_", 1, 4);
        let expected = collect(&rules);
        let shared = SharedSequence::new(CandidateSequence::new(rules));

        let pulled: Vec<Vec<Candidate>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let mut mine = Vec::new();
                        while let Some(c) = shared.pull() {
                            mine.push(c);
                        }
                        mine
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("puller thread"))
                .collect()
        });

        let all: Vec<String> = pulled
            .into_iter()
            .flatten()
            .map(|c| c.as_str().to_string())
            .collect();
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(all.len(), expected.len());
        assert_eq!(unique.len(), expected.len());
    }

    #[test]
    fn test_pull_with_observes_in_order() {
        let rules = rules("ab", 1, 2);
        let shared = SharedSequence::new(CandidateSequence::new(rules));
        let mut seen = Vec::new();
        while shared
            .pull_with(|c| seen.push(c.as_str().to_string()))
            .is_some()
        {}
        assert_eq!(seen, vec!["a", "b", "aa", "ab", "ba", "bb"]);
    }
}
