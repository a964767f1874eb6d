//! Key-value store implementations

use crate::error::{Error, Result};
use crate::host::KeyValueStore;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key-value store kept in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `value` under `key`.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: Value) -> Self {
        let store = Self::new();
        store.entries.lock().insert(key.into(), value);
        store
    }

    /// Current value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_data(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key))
    }

    fn set_data(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Key-value store backed by one JSON object in a file
///
/// The file is read on every `get_data` and rewritten on every `set_data`;
/// a missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store at `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete `key` from the file. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut entries = self.entries_for_write()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.write_entries(&entries)?;
        }
        Ok(removed)
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(entries) => Ok(entries),
            _ => {
                debug!(path = ?self.path, "Store file is not a JSON object, treating as empty");
                Ok(Map::new())
            }
        }
    }

    /// Entries to build the next write on. A file that no longer parses is
    /// replaced rather than blocking every later write.
    fn entries_for_write(&self) -> Result<Map<String, Value>> {
        match self.read_entries() {
            Err(Error::Json(err)) => {
                warn!(path = ?self.path, error = %err, "Store file is corrupt, overwriting");
                Ok(Map::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)?;
        debug!(path = ?self.path, "Wrote store file");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_data(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn set_data(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }
}
