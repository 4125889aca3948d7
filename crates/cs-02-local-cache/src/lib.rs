//! # CS-02 Local Cache Store
//!
//! Per-domain persistence of the consent decision, readable synchronously at
//! page start and shared by every tab of the same origin.
//!
//! **Subsystem ID:** 2
//!
//! ## Keys
//!
//! | Key | Contents |
//! |-----|----------|
//! | `privacy_consent` | Current `ConsentRecord` (JSON) |
//! | `privacy_consent_backup` | Last known `ConsentPreferences` |
//! | `privacy_consent_review` | One-shot "review my decision" flag |
//!
//! ## Failure Model
//!
//! Storage may be missing, full or corrupt. The cache never raises: reads
//! become `None`, writes return `false` and are logged at `error`.
//!
//! ## Module Structure
//!
//! ```text
//! cs-02-local-cache/
//! ├── domain/          # StorageError, StorageChange, CacheChange
//! ├── ports/           # KeyValueStorage, StorageWatcher
//! ├── adapters/        # InMemoryStorage/TabStorage, FileStorage
//! └── service/         # LocalConsentCache
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
#[cfg(feature = "file-storage")]
pub use adapters::FileStorage;
pub use adapters::{InMemoryStorage, TabStorage, UnavailableStorage};
pub use domain::{CacheChange, StorageChange, StorageError, WriterId};
pub use ports::{KeyValueStorage, StorageWatcher};
pub use service::{LocalConsentCache, BACKUP_KEY, CONSENT_KEY, PENDING_KEY, REVIEW_KEY};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
