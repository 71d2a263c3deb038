//! Durable key-value persistence for storefront records.
//!
//! # Records
//!
//! Three independent JSON records are kept, one per key:
//!
//! - products - ordered list of catalog products
//! - cart - mapping of product id to quantity
//! - orders - append-only list of placed orders
//!
//! Backends only move raw strings. [`PersistentStore`] layers typed JSON
//! encoding on top and turns unreadable or malformed records into
//! "not found" so callers can re-seed instead of failing.

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend I/O failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Raw string storage, modelled after browser `localStorage`.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Implementations must either write the whole value or leave the
    /// previous one in place.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// A record type that can be persisted.
///
/// `validate` runs after a successful JSON decode; a failing check marks the
/// stored value as corrupt.
pub trait StoredRecord: Serialize + DeserializeOwned {
    /// Check invariants that the JSON shape alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Outcome of reading a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    /// A structurally valid value.
    Found(T),
    /// Nothing is stored under the key.
    NotFound,
    /// Something is stored but it is not a valid record.
    Corrupt(String),
}

impl<T> Loaded<T> {
    /// Collapse into an `Option`, treating corruption as absence.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Corrupt(_) => None,
        }
    }
}

/// Typed JSON persistence over a [`KeyValueStorage`] backend.
///
/// Cheaply cloneable; every repository holds its own handle to the same
/// backend.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Wrap a storage backend.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStorage>) -> Self {
        Self { backend }
    }

    /// A store backed by a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn KeyValueStorage> {
        &self.backend
    }

    /// Read and validate the record under `key`.
    ///
    /// Never fails: unreadable storage and malformed values are reported as
    /// [`Loaded::Corrupt`] after emitting a warning.
    pub fn inspect<T: StoredRecord>(&self, key: &str) -> Loaded<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::NotFound,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage read failed, treating record as corrupt");
                return Loaded::Corrupt(e.to_string());
            }
        };

        let value = match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored record is not valid JSON for its type");
                return Loaded::Corrupt(e.to_string());
            }
        };

        if let Err(reason) = value.validate() {
            tracing::warn!(key, reason = %reason, "Stored record failed validation");
            return Loaded::Corrupt(reason);
        }

        Loaded::Found(value)
    }

    /// Read the record under `key`, or `None` if it is missing or corrupt.
    pub fn load<T: StoredRecord>(&self, key: &str) -> Option<T> {
        self.inspect(key).found()
    }

    /// Encode and write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails. On
    /// error the previously stored value is untouched.
    pub fn save<T: StoredRecord>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.set_item(key, &raw)?;
        tracing::trace!(key, bytes = raw.len(), "Record saved");
        Ok(())
    }

    /// Delete the record under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove_item(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        label: String,
        value: u32,
    }

    impl StoredRecord for Counter {
        fn validate(&self) -> Result<(), String> {
            if self.label.is_empty() {
                return Err("label is empty".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_save_then_load() {
        let store = PersistentStore::in_memory();
        let counter = Counter {
            label: "visits".to_string(),
            value: 3,
        };
        store.save("counter", &counter).unwrap();
        assert_eq!(store.load::<Counter>("counter"), Some(counter));
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let store = PersistentStore::in_memory();
        assert_eq!(store.inspect::<Counter>("counter"), Loaded::NotFound);
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let store = PersistentStore::in_memory();
        store.backend().set_item("counter", "{not json").unwrap();
        assert!(matches!(store.inspect::<Counter>("counter"), Loaded::Corrupt(_)));
        assert_eq!(store.load::<Counter>("counter"), None);
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let store = PersistentStore::in_memory();
        store
            .backend()
            .set_item("counter", r#"{"label":"x","value":"three"}"#)
            .unwrap();
        assert!(matches!(store.inspect::<Counter>("counter"), Loaded::Corrupt(_)));
    }

    #[test]
    fn test_failed_validation_is_corrupt() {
        let store = PersistentStore::in_memory();
        store
            .backend()
            .set_item("counter", r#"{"label":"","value":1}"#)
            .unwrap();
        assert_eq!(
            store.inspect::<Counter>("counter"),
            Loaded::Corrupt("label is empty".to_string())
        );
    }

    #[test]
    fn test_clear_removes_record() {
        let store = PersistentStore::in_memory();
        store
            .save(
                "counter",
                &Counter {
                    label: "a".to_string(),
                    value: 1,
                },
            )
            .unwrap();
        store.clear("counter").unwrap();
        assert_eq!(store.inspect::<Counter>("counter"), Loaded::NotFound);
        // Clearing twice is fine
        store.clear("counter").unwrap();
    }
}
