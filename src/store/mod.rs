//! Session store
//!
//! Key-value persistence for the session's small JSON blobs: the live cart
//! and the saved draft. The trait is async because real stores (browser
//! storage bridges, remote profiles) are; the bundled implementations are an
//! in-memory map and a single-file JSON store.
//!
//! Ordering guarantee: a `put` issued after a cart mutation is observed by
//! any later `get` within the same session. Across sessions the stored key
//! is last-write-wins.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

pub mod file;

pub use file::JsonFileStore;

/// Store key for the live cart.
pub const CART_KEY: &str = "pos_cart";

/// Store key for the saved draft transaction.
pub const DRAFT_KEY: &str = "pos_draft_transaction";

/// Errors from reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value could not be serialized or deserialized.
    #[error("invalid stored value for {key}")]
    InvalidValue {
        /// The store key involved.
        key: String,

        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// The backing storage failed.
    #[error("storage io error")]
    Io(#[from] std::io::Error),
}

/// Durable key-value storage for JSON-serializable session blobs.
#[automock]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage fails.
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Fetch the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage fails.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Remove the value under `key`. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage fails.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> SessionStore for std::sync::Arc<S>
where
    S: SessionStore + ?Sized,
{
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}

/// Serialize `value` and store it under `key`.
///
/// # Errors
///
/// Returns a [`StoreError`] if serialization or the underlying put fails.
pub async fn put_value<S, T>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: SessionStore + ?Sized,
    T: Serialize + Sync,
{
    let value = serde_json::to_value(value).map_err(|source| StoreError::InvalidValue {
        key: key.to_string(),
        source,
    })?;

    store.put(key, value).await
}

/// Fetch and deserialize the value under `key`, or `None` if absent.
///
/// # Errors
///
/// Returns a [`StoreError`] if the underlying get fails or the stored value
/// does not deserialize into `T`.
pub async fn get_value<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: SessionStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(value) = store.get(key).await? else {
        return Ok(None);
    };

    let parsed = serde_json::from_value(value).map_err(|source| StoreError::InvalidValue {
        key: key.to_string(),
        source,
    })?;

    Ok(Some(parsed))
}

/// In-memory store, durable only for the lifetime of the process. The
/// default store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<FxHashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, FxHashMap<String, Value>> {
        // A poisoned lock only means a writer panicked mid-insert of a
        // complete value; the map itself is still usable.
        match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values().insert(key.to_string(), value);

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values().remove(key);

        Ok(())
    }
}
