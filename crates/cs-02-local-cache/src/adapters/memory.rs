//! # In-Memory Storage
//!
//! One `InMemoryStorage` models the storage shared by every tab of an origin.
//! Each `TabStorage` handle is one tab: its writes are visible to every handle
//! at once and announced to the *other* handles' watchers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::domain::{StorageChange, StorageError, WriterId};
use crate::ports::{KeyValueStorage, StorageWatcher};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

struct Origin {
    entries: RwLock<HashMap<String, String>>,
    changes: broadcast::Sender<StorageChange>,
    quota_bytes: Option<usize>,
}

impl Origin {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, writer: WriterId, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut entries = self.entries.write();
            if let Some(quota) = self.quota_bytes {
                let used: usize = entries
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum::<usize>()
                    + key.len()
                    + value.len();
                if used > quota {
                    return Err(StorageError::QuotaExceeded { used, quota });
                }
            }
            entries.insert(key.to_string(), value.to_string());
        }
        self.announce(writer, key, Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, writer: WriterId, key: &str) {
        let existed = self.entries.write().remove(key).is_some();
        if existed {
            self.announce(writer, key, None);
        }
    }

    fn announce(&self, writer: WriterId, key: &str, new_value: Option<String>) {
        // No receivers is fine: no other tab is open.
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
            new_value,
            writer,
        });
    }
}

/// Storage shared by all tabs of one origin.
///
/// Usable directly as a single handle; call [`InMemoryStorage::tab`] for
/// additional tabs.
#[derive(Clone)]
pub struct InMemoryStorage {
    origin: Arc<Origin>,
    writer: WriterId,
}

impl InMemoryStorage {
    /// Create empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create empty storage that rejects writes beyond `quota_bytes`
    /// (keys plus values).
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self::build(Some(quota_bytes))
    }

    fn build(quota_bytes: Option<usize>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            origin: Arc::new(Origin {
                entries: RwLock::new(HashMap::new()),
                changes,
                quota_bytes,
            }),
            writer: WriterId::new(),
        }
    }

    /// Open another tab on the same origin.
    #[must_use]
    pub fn tab(&self) -> TabStorage {
        TabStorage {
            origin: Arc::clone(&self.origin),
            writer: WriterId::new(),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.origin.entries.read().len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.origin.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.origin.set(self.writer, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.origin.remove(self.writer, key);
        Ok(())
    }

    fn watch(&self) -> Option<StorageWatcher> {
        Some(StorageWatcher::new(
            self.origin.changes.subscribe(),
            self.writer,
        ))
    }
}

/// One tab's handle on an [`InMemoryStorage`] origin.
#[derive(Clone)]
pub struct TabStorage {
    origin: Arc<Origin>,
    writer: WriterId,
}

impl TabStorage {
    /// This tab's writer identity.
    #[must_use]
    pub fn writer(&self) -> WriterId {
        self.writer
    }
}

impl KeyValueStorage for TabStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.origin.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.origin.set(self.writer, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.origin.remove(self.writer, key);
        Ok(())
    }

    fn watch(&self) -> Option<StorageWatcher> {
        Some(StorageWatcher::new(
            self.origin.changes.subscribe(),
            self.writer,
        ))
    }
}

/// Storage that is switched off, like a browser with storage disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }
}
