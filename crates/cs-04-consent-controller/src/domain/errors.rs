//! # Domain Errors

use shared_types::DomainError;
use thiserror::Error;

/// Controller error types.
///
/// Consent reads and writes never fail; these cover misuse at the edges.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// `start` was called on a controller that is already running.
    #[error("Controller background task already started")]
    AlreadyStarted,

    /// A category or value supplied by the caller was not recognized.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
