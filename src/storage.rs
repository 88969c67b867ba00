//! Durable key/value storage for the user's locale preference.

mod file;

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

pub use file::FileStore;

/// Failure to read or write the preference store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Preference storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Preference storage is unavailable: {0}")]
    Unavailable(String),
}

/// Client-side persistent storage (the moral equivalent of `localStorage`).
pub trait PreferenceStore: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store. Clones share the same entries, which lets a
/// re-created state manager see what a previous one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Stored key/value pairs.
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the entries, recovering from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
