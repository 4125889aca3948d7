//! # CS-03 Cross-Domain Sync Client
//!
//! Resolves "is there a valid consent decision, and if not can the shared
//! remote store supply one", and keeps the local cache eventually consistent
//! with decisions made on other domains of the same group.
//!
//! **Subsystem ID:** 3
//!
//! ## Resolution Order
//!
//! ```text
//! check_consent()
//!   1. local cache valid?      ──yes──→ { hasConsent, source: local }
//!   2. GET /check (cookie id)  ──200──→ write-through, { source: cross-domain }
//!                              ──404 / error──→ { hasConsent: false, showBanner }
//! ```
//!
//! Writes are local first: `save_consent` and `revoke_consent` change the
//! cache before touching the network, and a failed remote call never rolls
//! the local change back.
//!
//! ## Module Structure
//!
//! ```text
//! cs-03-cross-domain-sync/
//! ├── config.rs        # SyncConfig
//! ├── domain/          # wire types, SyncError, outcomes, PendingPush
//! ├── ports/           # CrossDomainSyncApi (in), RemoteConsentStore (out)
//! ├── adapters/        # HttpRemoteConsentStore (reqwest)
//! └── application/     # CrossDomainSyncClient, PeriodicSync
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
#[cfg(feature = "http")]
pub use adapters::HttpRemoteConsentStore;
pub use application::{CrossDomainSyncClient, PeriodicSync, SyncHandle};
pub use config::{SyncConfig, DEFAULT_SYNC_INTERVAL_SECS};
pub use domain::{
    CheckResponse, ConsentCheck, ConsentSource, PendingPush, RevokeOutcome, RevokeRequest,
    RevokeResponse, SaveOutcome, SaveRequest, SaveResponse, SyncError, SyncOutcome,
};
pub use ports::{CrossDomainSyncApi, MockRemoteStore, RemoteConsentStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
