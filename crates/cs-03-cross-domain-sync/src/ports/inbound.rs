//! # Inbound Ports
//!
//! API trait defining what the Cross-Domain Sync Client can do.

use async_trait::async_trait;
use shared_types::ConsentPreferences;

use crate::domain::{ConsentCheck, RevokeOutcome, SaveOutcome, SyncOutcome};

/// Cross-domain sync API - inbound port.
///
/// No operation returns an error: failures are part of the outcome.
#[async_trait]
pub trait CrossDomainSyncApi: Send + Sync {
    /// Resolve the current decision: valid local cache, then the remote
    /// store, then "no consent".
    async fn check_consent(&self) -> ConsentCheck;

    /// Record a new decision locally, then push it to the remote store.
    async fn save_consent(&self, preferences: ConsentPreferences) -> SaveOutcome;

    /// Clear the local decision, then revoke it remotely.
    async fn revoke_consent(&self) -> RevokeOutcome;

    /// One resync pass against the remote store.
    async fn sync_consent(&self) -> SyncOutcome;
}
