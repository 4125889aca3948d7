//! # Error Types
//!
//! Defines error types shared across subsystems.

use thiserror::Error;

/// Errors from parsing or validating shared domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The category name is not one of the four consent categories.
    #[error("Unknown consent category: {0}")]
    UnknownCategory(String),

    /// A persisted or received record could not be decoded.
    #[error("Malformed consent record: {0}")]
    MalformedRecord(String),
}
