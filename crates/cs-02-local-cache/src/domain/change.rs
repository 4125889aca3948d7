//! # Storage Changes
//!
//! Change notifications delivered to other tabs sharing the same origin
//! storage, mirroring browser `storage` events.

use shared_types::ConsentRecord;
use uuid::Uuid;

/// Identity of one storage handle (one tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterId(Uuid);

impl WriterId {
    /// A fresh random writer identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WriterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WriterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key was set or removed by some writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Key that changed.
    pub key: String,
    /// New value; `None` means the key was removed.
    pub new_value: Option<String>,
    /// Handle that made the change.
    pub writer: WriterId,
}

/// What a storage change means for the consent decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheChange {
    /// Another tab saved a new decision.
    Replaced(ConsentRecord),
    /// Another tab cleared the decision (revoke).
    Cleared,
}
