//! # Domain Errors
//!
//! Storage failures. The cache layer above never surfaces these to callers;
//! they are logged and turned into `None`/`false`.

use thiserror::Error;

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file or device error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(String),

    /// Storage is disabled or not reachable (private mode, sandbox).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the storage quota.
    #[error("storage quota exceeded: {used} of {quota} bytes")]
    QuotaExceeded {
        /// Bytes that would be in use after the write.
        used: usize,
        /// Configured quota in bytes.
        quota: usize,
    },
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
