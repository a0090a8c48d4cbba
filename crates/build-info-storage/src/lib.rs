#![warn(missing_docs)]
//! # build-info-storage
//!
//! ## Purpose
//! Local key-value persistence for the form draft.
//!
//! ## Responsibilities
//! - Define the injectable [`KeyValueStore`] abstraction (read/write/delete).
//! - Provide a JSON-file backed store and an in-memory store.
//! - Wrap a store as a [`DraftStore`] bound to the single draft key.
//!
//! ## Data flow
//! The form controller snapshots [`FormData`] -> [`DraftStore::save`] encodes
//! it with `build_info_core::draft_to_json` -> [`KeyValueStore::write`]
//! replaces the stored value wholesale.
//!
//! ## Ownership and lifetimes
//! Stores are shared behind `Arc<dyn KeyValueStore>` and use interior
//! mutability, so every operation takes `&self`.
//!
//! ## Error model
//! All failures are [`StorageError`] values. Callers in the form controller
//! log and ignore them.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use build_info_core::{CoreError, DRAFT_STORAGE_KEY, FormData, draft_from_json, draft_to_json};
use serde_json::{Map, Value};
use thiserror::Error;

/// Abstract local key-value storage area.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage area persisted as one JSON object in a file.
///
/// # Notes
/// Every write rewrites the whole file through a sibling `.json.tmp` file
/// followed by a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load_area(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(StorageError::Io(error)),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(area) => Ok(area),
            _ => Err(StorageError::Corrupt(format!(
                "'{}' does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn store_area(&self, area: Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_vec_pretty(&Value::Object(area))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn locked<T>(
        &self,
        f: impl FnOnce(&Self) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        f(self)
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        validate_key(key)?;
        self.locked(|store| Ok(store.load_area()?.remove(key)))
    }

    fn write(&self, key: &str, value: Value) -> Result<(), StorageError> {
        validate_key(key)?;
        self.locked(|store| {
            let mut area = store.load_area()?;
            area.insert(key.to_string(), value);
            store.store_area(area)
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.locked(|store| {
            let mut area = store.load_area()?;
            if area.remove(key).is_some() {
                store.store_area(area)?;
            }
            Ok(())
        })
    }
}

/// Volatile storage area for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Draft accessor bound to [`DRAFT_STORAGE_KEY`].
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    /// Wraps a storage area.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted draft, if one exists.
    ///
    /// # Errors
    /// Returns [`StorageError`] for backend failures or a malformed draft.
    pub fn load(&self) -> Result<Option<FormData>, StorageError> {
        match self.store.read(DRAFT_STORAGE_KEY)? {
            Some(value) => Ok(Some(draft_from_json(value)?)),
            None => Ok(None),
        }
    }

    /// Replaces the persisted draft with `data`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend write fails.
    pub fn save(&self, data: &FormData) -> Result<(), StorageError> {
        self.store.write(DRAFT_STORAGE_KEY, draft_to_json(data))?;
        tracing::debug!(
            stage = "storage",
            action = "draft_saved",
            fields = data.len(),
            "draft persisted"
        );
        Ok(())
    }

    /// Deletes the persisted draft.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend delete fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.delete(DRAFT_STORAGE_KEY)
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey);
    }
    Ok(())
}

/// Errors produced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage key is blank.
    #[error("storage key must be non-empty")]
    InvalidKey,
    /// Filesystem failure.
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding/decoding failure.
    #[error("storage codec failure: {0}")]
    Codec(#[from] serde_json::Error),
    /// Storage file holds something other than a JSON object.
    #[error("storage area is corrupt: {0}")]
    Corrupt(String),
    /// Stored draft has an invalid shape.
    #[error("stored draft is invalid: {0}")]
    Draft(#[from] CoreError),
    /// A previous holder of the store lock panicked.
    #[error("storage lock poisoned")]
    Poisoned,
    /// Backend-specific failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}
