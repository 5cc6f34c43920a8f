//! Durable key-value storage for lock state and settings.
//!
//! Two keys are used, each holding a whole object that is overwritten on
//! every save: [`LOCKED_TABS_KEY`] and [`SETTINGS_KEY`]. Values are encoded
//! with postcard.

use crate::error::{LockError, Result};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key holding the tab-identity → record map.
pub const LOCKED_TABS_KEY: &str = "lockedTabs";

/// Key holding the global settings.
pub const SETTINGS_KEY: &str = "settings";

const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("state");

/// Durable mapping from string keys to opaque values.
pub trait PersistentStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrites the value stored under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// Reads and decodes a typed value.
pub fn load_value<T: DeserializeOwned>(store: &impl PersistentStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(bytes) => postcard::from_bytes(&bytes)
            .map(Some)
            .map_err(|e| LockError::Deserialization(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

/// Encodes and writes a typed value.
pub fn save_value<T: Serialize>(store: &mut impl PersistentStore, key: &str, value: &T) -> Result<()> {
    let bytes = postcard::to_allocvec(value)
        .map_err(|e| LockError::Serialization(format!("{}: {}", key, e)))?;
    store.set(key, &bytes)
}

fn store_error(context: &str, e: impl std::fmt::Display) -> LockError {
    LockError::Store(format!("{}: {}", context, e))
}

/// Store backed by a redb database file.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Opens the database at `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path).map_err(|e| store_error("Failed to open store", e))?;

        Ok(Self { db, path })
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistentStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| store_error("Failed to begin read transaction", e))?;

        let table = match read_txn.open_table(STATE_TABLE) {
            Ok(table) => table,
            // Nothing has been written yet.
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(store_error("Failed to open state table", e)),
        };

        let value = table
            .get(key)
            .map_err(|e| store_error("Failed to read value", e))?;

        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| store_error("Failed to begin write transaction", e))?;

        {
            let mut table = write_txn
                .open_table(STATE_TABLE)
                .map_err(|e| store_error("Failed to open state table", e))?;

            table
                .insert(key, value)
                .map_err(|e| store_error("Failed to insert value", e))?;
        }

        write_txn
            .commit()
            .map_err(|e| store_error("Failed to commit transaction", e))?;

        Ok(())
    }
}

/// In-memory store, used by tests and the replay command.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(LockError::Store(format!("write to {} refused", key)));
        }
        self.values.insert(key.to_string(), value.to_vec());
        self.writes += 1;
        Ok(())
    }
}
