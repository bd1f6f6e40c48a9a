//! Ranking & ordering
//!
//! Scores used by the suggester and the searcher, plus the single ordering
//! routine both of them share so that ties always break the same way.

use serde::Serialize;
use std::cmp::Ordering;

/// Shared run length relative to the term's length, compared exactly
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Affinity {
    shared: usize,
    length: usize,
}

impl Affinity {
    /// An empty term has zero affinity
    pub fn new(shared: usize, length: usize) -> Self {
        if length == 0 {
            Self { shared: 0, length: 1 }
        } else {
            Self { shared, length }
        }
    }
}

impl Ord for Affinity {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.shared as u128 * other.length as u128;
        let rhs = other.shared as u128 * self.length as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Affinity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Affinity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Affinity {}

/// Similarity of a term to a query. Compares affinity first, then overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Similarity {
    pub affinity: Affinity,
    pub overlap: usize,
}

/// Where a search query was found in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// The term itself contains the query
    Term,
    /// Only the definition contains the query
    Definition,
}

/// A term waiting to be ordered. Lower `rank` sorts first.
#[derive(Debug, Clone)]
pub struct Ranked<'a, K> {
    pub rank: K,
    /// Normalized term, first tie-break
    pub key: String,
    /// Original term, last tie-break and the value handed back to callers
    pub term: &'a str,
}

impl<'a, K> Ranked<'a, K> {
    pub fn new(rank: K, key: String, term: &'a str) -> Self {
        Self { rank, key, term }
    }
}

/// Order by rank, then normalized term, then original term
pub fn sort_ranked<K: Ord>(items: &mut [Ranked<'_, K>]) {
    items.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.term.cmp(b.term))
    });
}

/// Collect the original terms in their sorted order
pub fn into_terms<K>(items: Vec<Ranked<'_, K>>) -> Vec<String> {
    items.into_iter().map(|item| item.term.to_string()).collect()
}
