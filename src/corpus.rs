//! Glossary corpus snapshot
//!
//! A [`Corpus`] is the read-only view every engine operation runs against.
//! Records keep their insertion order; a normalized-term index answers exact
//! lookups.

use crate::search::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Term as it was written (original casing)
    pub term: String,
    /// Free-text definition
    pub definition: String,
}

impl Record {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Immutable snapshot of the glossary
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    /// normalized term -> position in `records`
    index: HashMap<String, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot, resolving duplicate terms the way the store does:
    /// a later record with the same normalized term replaces the earlier one
    /// in place.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut corpus = Self::new();
        for record in records {
            corpus.insert(record);
        }
        corpus
    }

    /// Insert or overwrite a record. Returns the record it replaced.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        let key = normalize(&record.term);
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Exact match on the normalized term
    pub fn lookup(&self, query: &str) -> Option<&Record> {
        self.index
            .get(&normalize(query))
            .map(|&pos| &self.records[pos])
    }

    /// Records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Corpus {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}
