//! # Domain Errors
//!
//! Failures talking to the remote consent store. Public client operations
//! never return these; they are folded into outcome values.

use thiserror::Error;

/// Remote sync error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Connection, timeout or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("Remote store returned HTTP {0}")]
    Status(u16),

    /// The store answered 2xx but reported `success: false`.
    #[error("Remote store rejected the request: {0}")]
    Rejected(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Local persistence failed.
    #[error("Local storage error: {0}")]
    Storage(String),
}

impl SyncError {
    /// Whether retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Network(_) => true,
            SyncError::Status(code) => *code >= 500 || *code == 429 || *code == 408,
            SyncError::Rejected(_) | SyncError::Decode(_) | SyncError::Storage(_) => false,
        }
    }
}
