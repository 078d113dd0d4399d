//! JSON file store
//!
//! Single-file [`SessionStore`] for durability across restarts: the whole
//! key space is one JSON object, rewritten on every put/delete. The blobs
//! are a cart and a draft, so rewriting wholesale is cheaper than being
//! clever.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::{SessionStore, StoreError};

/// File-backed session store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<FxHashMap<String, Value>>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading any existing contents. A missing file
    /// starts empty and is created on first write.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file exists but cannot be read or is
    /// not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;

            serde_json::from_str(&contents).map_err(|source| StoreError::InvalidValue {
                key: path.display().to_string(),
                source,
            })?
        } else {
            FxHashMap::default()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// The file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn values(&self) -> MutexGuard<'_, FxHashMap<String, Value>> {
        match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn flush(&self, values: &FxHashMap<String, Value>) -> Result<(), StoreError> {
        let contents =
            serde_json::to_string_pretty(values).map_err(|source| StoreError::InvalidValue {
                key: self.path.display().to_string(),
                source,
            })?;

        fs::write(&self.path, contents)?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values();

        values.insert(key.to_string(), value);

        self.flush(&values)
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values();

        values.remove(key);

        self.flush(&values)
    }
}
