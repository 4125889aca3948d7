//! # Outbound Ports
//!
//! The key-value storage the cache persists into.
//!
//! Production: `FileStorage` (durable JSON document)
//! Testing: `InMemoryStorage` / `TabStorage` (shared origin, per-tab handles)

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{StorageChange, StorageError, WriterId};

/// Synchronous string key-value storage scoped to one origin.
///
/// Writes must be readable immediately by the same handle.
pub trait KeyValueStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to changes made by *other* handles on the same origin.
    ///
    /// Backends without change notification return `None`.
    fn watch(&self) -> Option<StorageWatcher> {
        None
    }
}

/// Receives changes made by other handles sharing the same storage.
pub struct StorageWatcher {
    receiver: broadcast::Receiver<StorageChange>,
    own_writer: WriterId,
}

impl StorageWatcher {
    /// Create a watcher that skips changes written by `own_writer`.
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<StorageChange>, own_writer: WriterId) -> Self {
        Self {
            receiver,
            own_writer,
        }
    }

    /// Wait for the next foreign change.
    ///
    /// Returns `None` once the storage has been dropped.
    pub async fn changed(&mut self) -> Option<StorageChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.writer == self.own_writer => continue,
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "[cs-02] Storage watcher lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`StorageWatcher::changed`].
    pub fn try_changed(&mut self) -> Option<StorageChange> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) if change.writer == self.own_writer => continue,
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

impl std::fmt::Debug for StorageWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageWatcher")
            .field("own_writer", &self.own_writer)
            .finish_non_exhaustive()
    }
}
