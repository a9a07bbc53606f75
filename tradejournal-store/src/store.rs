//! On-disk journal: a single pretty-printed JSON file in the data directory.
//!
//! Saves go through a sibling temp file and a rename so a crash never leaves
//! a half-written journal behind. An empty journal removes the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::journal::Journal;

/// Current journal file schema. Files written by a newer build are rejected.
pub const SCHEMA_VERSION: u32 = 1;

pub const JOURNAL_FILE: &str = "journal.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("journal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize journal: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unsupported schema version {found} (max supported: {max})")]
    UnsupportedSchema { found: u32, max: u32 },
}

#[derive(Debug, Clone)]
pub struct JournalStore {
    path: PathBuf,
}

impl JournalStore {
    /// Store backed by `journal.json` inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(JOURNAL_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the journal. A missing file is an empty journal.
    pub fn load(&self) -> Result<Journal, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no journal file yet");
                return Ok(Journal::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut journal: Journal =
            serde_json::from_str(&json).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if journal.schema_version > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found: journal.schema_version,
                max: SCHEMA_VERSION,
            });
        }
        if journal.schema_version < SCHEMA_VERSION {
            warn!(
                found = journal.schema_version,
                current = SCHEMA_VERSION,
                "upgrading journal schema on next save"
            );
            journal.schema_version = SCHEMA_VERSION;
        }
        journal.repair_selection();

        debug!(
            path = %self.path.display(),
            strategies = journal.strategies.len(),
            "loaded journal"
        );
        Ok(journal)
    }

    /// Persist the journal, or remove the file when no strategies remain.
    pub fn save(&self, journal: &Journal) -> Result<(), StoreError> {
        if journal.is_empty() {
            return self.clear();
        }

        let json = serde_json::to_string_pretty(journal).map_err(StoreError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "saved journal");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "journal empty, removed file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn journal_with(names: &[&str]) -> Journal {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut journal = Journal::default();
        for name in names {
            journal.create_strategy(name, None, now).unwrap();
        }
        journal
    }

    #[test]
    fn journal_file_lives_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path());
        assert_eq!(store.path(), dir.path().join(JOURNAL_FILE));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path());
        let journal = store.load().unwrap();
        assert!(journal.is_empty());
        assert_eq!(journal.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn save_then_load_keeps_selection() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path().join("nested"));
        let journal = journal_with(&["A", "B"]);
        store.save(&journal).unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
        assert_eq!(store.load().unwrap(), journal);
    }

    #[test]
    fn empty_journal_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path());
        store.save(&journal_with(&["A"])).unwrap();
        assert!(store.path().exists());

        store.save(&Journal::default()).unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine.
        store.save(&Journal::default()).unwrap();
    }

    #[test]
    fn newer_schema_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path());
        fs::write(
            store.path(),
            r#"{"schemaVersion": 99, "strategies": {}, "currentStrategy": null}"#,
        )
        .unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::UnsupportedSchema { found: 99, max: SCHEMA_VERSION })
        ));
    }

    #[test]
    fn garbage_reports_path() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains(JOURNAL_FILE));
    }

    #[test]
    fn dangling_selection_is_repaired_on_load() {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::new(dir.path());
        let mut journal = journal_with(&["A"]);
        let first = journal.strategies.keys().next().cloned();
        journal.current_strategy = Some(tradejournal_core::domain::StrategyId::new("gone"));
        store.save(&journal).unwrap();

        assert_eq!(store.load().unwrap().current_strategy, first);
    }
}
