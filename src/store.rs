//! Glossary store backed by a JSON file
//!
//! Holds the definitions and a log of bot interactions. Writers take an
//! exclusive lock on `{store}.lock` and replace the store file through a
//! `.tmp` rename, so readers always see a complete file.

use crate::corpus::{Corpus, Record};
use crate::error::StoreError;
use crate::search::normalize;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Interactions kept in the log; older ones are dropped but still counted
const MAX_LOGGED_INTERACTIONS: usize = 1000;

/// Kinds of bot interaction that are logged and counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Define,
    Lookup,
    Search,
    Delete,
    Help,
    Stats,
    Recent,
}

/// A definition as persisted, with bookkeeping the engine never sees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDefinition {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Store-wide counter value at the last write, orders `recent`
    #[serde(default)]
    pub revision: u64,
}

/// One logged interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub action: Action,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub at: DateTime<Utc>,
}

/// What a define call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineOutcome {
    Created,
    Updated { previous: String },
}

/// Counters reported by the `stats` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub definitions: usize,
    pub interactions: BTreeMap<Action, u64>,
}

impl StoreStats {
    pub fn count(&self, action: Action) -> u64 {
        self.interactions.get(&action).copied().unwrap_or(0)
    }
}

/// On-disk format
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    definitions: Vec<StoredDefinition>,
    #[serde(default)]
    interactions: Vec<Interaction>,
    #[serde(default)]
    counts: BTreeMap<Action, u64>,
    #[serde(default)]
    revision: u64,
}

impl StoreFile {
    fn position(&self, term: &str) -> Option<usize> {
        let key = normalize(term);
        self.definitions
            .iter()
            .position(|d| normalize(&d.term) == key)
    }

    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

/// File-backed glossary store
#[derive(Debug, Clone)]
pub struct GlossaryStore {
    path: PathBuf,
}

impl GlossaryStore {
    /// Open (or prepare) the store at `path`, creating its directory
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let parent = path
            .parent()
            .ok_or_else(|| StoreError::InvalidPath(path.display().to_string()))?;

        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            info!("Created store directory: {}", parent.display());
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consistent read-only view of all definitions
    pub fn snapshot(&self) -> Result<Corpus, StoreError> {
        let file = self.read()?;
        debug!("Loaded snapshot with {} definitions", file.definitions.len());

        Ok(file
            .definitions
            .into_iter()
            .map(|d| Record::new(d.term, d.definition))
            .collect())
    }

    /// Create a definition or overwrite the one with the same normalized term
    pub fn define(
        &self,
        term: &str,
        definition: &str,
        creator: Option<&str>,
    ) -> Result<DefineOutcome, StoreError> {
        self.update(|file| {
            let now = Utc::now();
            let revision = file.next_revision();

            match file.position(term) {
                Some(pos) => {
                    let existing = &mut file.definitions[pos];
                    let previous = std::mem::replace(&mut existing.definition, definition.to_string());
                    existing.term = term.to_string();
                    existing.updated_at = now;
                    existing.revision = revision;
                    DefineOutcome::Updated { previous }
                }
                None => {
                    file.definitions.push(StoredDefinition {
                        term: term.to_string(),
                        definition: definition.to_string(),
                        creator: creator.map(str::to_string),
                        created_at: now,
                        updated_at: now,
                        revision,
                    });
                    DefineOutcome::Created
                }
            }
        })
    }

    /// Remove a definition. Returns it, or `None` when no such term exists.
    pub fn delete(&self, term: &str) -> Result<Option<StoredDefinition>, StoreError> {
        self.update(|file| {
            file.position(term)
                .map(|pos| file.definitions.remove(pos))
        })
    }

    /// Most recently written definitions, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredDefinition>, StoreError> {
        let mut definitions = self.read()?.definitions;
        definitions.sort_by(|a, b| b.revision.cmp(&a.revision));
        definitions.truncate(limit);
        Ok(definitions)
    }

    /// Log an interaction and bump its counter
    pub fn record_interaction(
        &self,
        action: Action,
        text: &str,
        user: Option<&str>,
    ) -> Result<(), StoreError> {
        self.update(|file| {
            *file.counts.entry(action).or_insert(0) += 1;
            file.interactions.push(Interaction {
                action,
                text: text.to_string(),
                user: user.map(str::to_string),
                at: Utc::now(),
            });

            let excess = file.interactions.len().saturating_sub(MAX_LOGGED_INTERACTIONS);
            if excess > 0 {
                file.interactions.drain(..excess);
            }
        })
    }

    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let file = self.read()?;
        Ok(StoreStats {
            definitions: file.definitions.len(),
            interactions: file.counts,
        })
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }

        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(StoreFile::default());
        }

        Ok(serde_json::from_str(&data)?)
    }

    /// Read-modify-write under the store lock
    fn update<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut StoreFile) -> T,
    {
        let lock_path = self.path.with_extension("lock");
        let lock_file = fs::File::create(&lock_path)?;
        lock_file.lock_exclusive()?;

        let result: Result<T, StoreError> = (|| {
            let mut file = self.read()?;
            let value = mutate(&mut file);

            let tmp_path = self.path.with_extension("json.tmp");
            fs::write(&tmp_path, serde_json::to_string_pretty(&file)?)?;
            fs::rename(&tmp_path, &self.path)?;
            Ok(value)
        })();

        lock_file.unlock()?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, GlossaryStore) {
        let dir = TempDir::new().unwrap();
        let store = GlossaryStore::open(dir.path().join("nested").join("glossary.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store_snapshot() {
        let (_dir, store) = temp_store();
        let corpus = store.snapshot().unwrap();
        assert!(corpus.is_empty());
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn test_define_and_snapshot() {
        let (_dir, store) = temp_store();
        assert_eq!(
            store.define("SAWS", "welfare system", Some("maya")).unwrap(),
            DefineOutcome::Created
        );

        let corpus = store.snapshot().unwrap();
        let record = corpus.lookup("saws").unwrap();
        assert_eq!(record.term, "SAWS");
        assert_eq!(record.definition, "welfare system");
    }

    #[test]
    fn test_redefine_overwrites_by_normalized_term() {
        let (_dir, store) = temp_store();
        store.define("TAY", "old", None).unwrap();
        store.define("WIB", "board", None).unwrap();

        let outcome = store.define("tay", "new", None).unwrap();
        assert_eq!(
            outcome,
            DefineOutcome::Updated {
                previous: "old".to_string()
            }
        );

        let corpus = store.snapshot().unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0], Record::new("tay", "new"));
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = temp_store();
        store.define("luster", "a prominent gloss", None).unwrap();

        let removed = store.delete("LUSTER").unwrap();
        assert_eq!(removed.map(|d| d.term), Some("luster".to_string()));
        assert!(store.delete("luster").unwrap().is_none());
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_recent_orders_by_last_write() {
        let (_dir, store) = temp_store();
        store.define("a", "1", None).unwrap();
        store.define("b", "2", None).unwrap();
        store.define("c", "3", None).unwrap();
        store.define("A", "4", None).unwrap();

        let recent: Vec<String> = store.recent(3).unwrap().into_iter().map(|d| d.term).collect();
        assert_eq!(recent, vec!["A", "c", "b"]);
    }

    #[test]
    fn test_interactions_are_counted() {
        let (_dir, store) = temp_store();
        store.define("x", "y", None).unwrap();
        store.record_interaction(Action::Lookup, "x", Some("maya")).unwrap();
        store.record_interaction(Action::Lookup, "z", None).unwrap();
        store.record_interaction(Action::Search, "y", None).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.definitions, 1);
        assert_eq!(stats.count(Action::Lookup), 2);
        assert_eq!(stats.count(Action::Search), 1);
        assert_eq!(stats.count(Action::Delete), 0);
    }

    #[test]
    fn test_interaction_log_is_capped() {
        let (_dir, store) = temp_store();
        for i in 0..(MAX_LOGGED_INTERACTIONS + 5) {
            store.record_interaction(Action::Help, &i.to_string(), None).unwrap();
        }

        let file = store.read().unwrap();
        assert_eq!(file.interactions.len(), MAX_LOGGED_INTERACTIONS);
        assert_eq!(file.interactions[0].text, "5");
        assert_eq!(store.stats().unwrap().count(Action::Help), (MAX_LOGGED_INTERACTIONS + 5) as u64);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.snapshot(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_store_persists_across_handles() {
        let (_dir, store) = temp_store();
        store.define("CalWIN", "CalWORKs Information Network", None).unwrap();

        let reopened = GlossaryStore::open(store.path()).unwrap();
        assert_eq!(reopened.snapshot().unwrap().len(), 1);
        assert!(!store.path().with_extension("json.tmp").exists());
    }
}
