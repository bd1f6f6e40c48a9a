//! Similarity metric for term suggestions
//!
//! A term is scored against a prepared query on two signals:
//! - affinity: shared contiguous runs between each query word and the term,
//!   relative to the term's length
//! - overlap: characters the query and the term have in common, counted as
//!   a multiset
//!
//! Both inputs are expected to be normalized already.

use super::ranking::{Affinity, Similarity};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Shortest shared run that counts towards affinity.
/// Query words shorter than this count only when shared in full.
pub const MIN_SHARED_RUN: usize = 3;

/// Query prepared once and scored against every term of a corpus
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    words: Vec<Vec<char>>,
    chars: HashMap<char, usize>,
}

impl FuzzyMatcher {
    /// Prepare a normalized query for scoring
    pub fn new(normalized_query: &str) -> Self {
        let words = normalized_query
            .unicode_words()
            .map(|word| word.chars().collect())
            .collect();

        Self {
            words,
            chars: char_counts(normalized_query),
        }
    }

    /// Score a normalized term against the query
    pub fn score(&self, normalized_term: &str) -> Similarity {
        let term: Vec<char> = normalized_term.chars().collect();

        let shared = self
            .words
            .iter()
            .map(|word| {
                let run = longest_common_run(word, &term);
                if run >= MIN_SHARED_RUN.min(word.len()) {
                    run
                } else {
                    0
                }
            })
            .sum();

        Similarity {
            affinity: Affinity::new(shared, term.len()),
            overlap: self.overlap(normalized_term),
        }
    }

    fn overlap(&self, normalized_term: &str) -> usize {
        char_counts(normalized_term)
            .iter()
            .map(|(ch, count)| self.chars.get(ch).map_or(0, |&ours| ours.min(*count)))
            .sum()
    }
}

/// Length of the longest run of characters that appears in both slices
pub fn longest_common_run(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Rolling row of run lengths ending at (i, j)
    let mut prev = vec![0usize; b.len() + 1];
    let mut best = 0;

    for &ca in a {
        let mut curr = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                curr[j + 1] = prev[j] + 1;
                best = best.max(curr[j + 1]);
            }
        }
        prev = curr;
    }

    best
}

/// Non-whitespace character counts
fn char_counts(text: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        *counts.entry(ch).or_insert(0) += 1;
    }
    counts
}
