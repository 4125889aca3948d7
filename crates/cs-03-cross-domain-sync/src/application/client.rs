//! # Cross-Domain Sync Client
//!
//! Local-first consent resolution. The local cache answers whenever it holds
//! a valid record; the remote store fills gaps and carries decisions between
//! domains of the same group.
//!
//! ## Failure Handling
//!
//! A local change whose remote call fails is remembered as a pending push
//! and retried on the next `sync_consent` pass. The pending push is kept in
//! the local cache, so a client built later over the same storage picks it
//! up. Until it is delivered, remote records no newer than it are not
//! adopted. A newer remote decision supersedes a pending push (last write by
//! timestamp wins).

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{ChangeOrigin, ConsentChange, ConsentEvent, EventPublisher, InMemoryEventBus};
use shared_types::{Clock, ConsentPreferences, ConsentRecord};
use tracing::{debug, info, warn};

use consent_telemetry::metrics;
use cs_02_local_cache::LocalConsentCache;

use crate::config::SyncConfig;
use crate::domain::{
    ConsentCheck, ConsentSource, PendingPush, RevokeOutcome, RevokeRequest, SaveOutcome,
    SaveRequest, SyncError, SyncOutcome,
};
use crate::ports::{CrossDomainSyncApi, RemoteConsentStore};

/// Cross-domain sync client, one per application root.
pub struct CrossDomainSyncClient<R: RemoteConsentStore> {
    /// Configuration.
    config: SyncConfig,
    /// This domain's cache.
    cache: LocalConsentCache,
    /// Shared remote store.
    remote: Arc<R>,
    /// Where consent events are announced.
    bus: Arc<InMemoryEventBus>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Local change not yet acknowledged by the remote store.
    pending: Mutex<Option<PendingPush>>,
}

impl<R: RemoteConsentStore> CrossDomainSyncClient<R> {
    /// Create a client.
    pub fn new(
        config: SyncConfig,
        cache: LocalConsentCache,
        remote: Arc<R>,
        bus: Arc<InMemoryEventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            endpoint = remote.endpoint(),
            domain = %config.domain,
            "[cs-03] Sync client created"
        );
        let pending = cache.read_pending::<PendingPush>();
        if let Some(pending) = &pending {
            info!(
                timestamp = pending.timestamp(),
                "[cs-03] Undelivered consent change restored from cache"
            );
        }
        Self {
            config,
            cache,
            remote,
            bus,
            clock,
            pending: Mutex::new(pending),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The local cache this client writes through.
    pub fn cache(&self) -> &LocalConsentCache {
        &self.cache
    }

    /// The event bus this client publishes on.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// The change waiting to be pushed, if any.
    pub fn pending_push(&self) -> Option<PendingPush> {
        self.pending.lock().clone()
    }

    /// Build a record for a decision made now on this domain.
    pub fn new_record(&self, preferences: ConsentPreferences) -> ConsentRecord {
        ConsentRecord::new(
            preferences,
            self.clock.now_ms(),
            self.config.domain.clone(),
            self.config.organization_id.clone(),
            self.config.policy_version.clone(),
        )
    }

    /// Fetch the remote decision, keeping it only if it is complete, valid
    /// at `now_ms` and made within this domain group.
    async fn fetch_remote(&self, now_ms: u64) -> Result<Option<ConsentRecord>, SyncError> {
        let Some(response) = self.remote.check().await? else {
            return Ok(None);
        };

        let Some(record) = response.into_record(
            &self.config.organization_id,
            &self.config.domain,
            &self.config.policy_version,
        ) else {
            return Ok(None);
        };

        if !record.is_valid_at(now_ms) {
            debug!(timestamp = record.timestamp, "[cs-03] Remote consent expired");
            return Ok(None);
        }
        if !self.config.shares_consent_with(&record.domain) {
            debug!(
                domain = %record.domain,
                "[cs-03] Remote consent from outside the domain group ignored"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn set_pending(&self, pending: Option<PendingPush>) {
        let mut current = self.pending.lock();
        match &pending {
            Some(change) => self.cache.write_pending(change),
            None => self.cache.clear_pending(),
        };
        *current = pending;
    }

    /// Clear the pending push only if it is still the one we attempted.
    fn resolve_pending(&self, attempted: &PendingPush) {
        let mut pending = self.pending.lock();
        if pending.as_ref() == Some(attempted) {
            self.cache.clear_pending();
            *pending = None;
        }
    }

    /// Answer a check from the undelivered local change alone.
    fn check_from_pending(&self, pending: Option<PendingPush>, now_ms: u64) -> ConsentCheck {
        match pending {
            Some(PendingPush::Save(record)) if record.is_valid_at(now_ms) => {
                metrics::record_check(ConsentSource::Local.as_str());
                ConsentCheck::found(record, ConsentSource::Local)
            }
            _ => {
                metrics::record_check("none");
                ConsentCheck::no_consent()
            }
        }
    }

    async fn publish(&self, event: ConsentEvent) {
        self.bus.publish(event).await;
    }

    fn revoke_request(&self, timestamp: u64) -> RevokeRequest {
        RevokeRequest {
            domain: self.config.domain.clone(),
            organization_id: self.config.organization_id.clone(),
            timestamp,
        }
    }

    async fn push_pending(&self, pending: PendingPush) -> SyncOutcome {
        let result = match &pending {
            PendingPush::Save(record) => self
                .remote
                .save(&SaveRequest::from(record))
                .await
                .map(|_| ()),
            PendingPush::Revoke { timestamp } => self
                .remote
                .revoke(&self.revoke_request(*timestamp))
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.resolve_pending(&pending);
                info!(
                    timestamp = pending.timestamp(),
                    "[cs-03] Pending consent change delivered"
                );
                if let PendingPush::Save(record) = &pending {
                    metrics::record_save(true);
                    self.publish(ConsentEvent::Saved(ConsentChange::new(
                        record.preferences,
                        record.timestamp,
                        ChangeOrigin::ThisTab,
                    )))
                    .await;
                } else {
                    metrics::record_revoke(true);
                }
                SyncOutcome::PushedPending
            }
            Err(e) => {
                let operation = match pending {
                    PendingPush::Save(_) => "save",
                    PendingPush::Revoke { .. } => "revoke",
                };
                warn!(error = %e, operation, "[cs-03] Pending consent change still undelivered");
                metrics::record_remote_failure(operation);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl<R: RemoteConsentStore + 'static> CrossDomainSyncApi for CrossDomainSyncClient<R> {
    async fn check_consent(&self) -> ConsentCheck {
        let now = self.clock.now_ms();

        if let Some(record) = self.cache.read_valid(now) {
            metrics::record_check(ConsentSource::Local.as_str());
            return ConsentCheck::found(record, ConsentSource::Local);
        }

        let pending = self.pending_push();
        match self.fetch_remote(now).await {
            Ok(Some(record))
                if pending
                    .as_ref()
                    .is_some_and(|p| record.timestamp <= p.timestamp()) =>
            {
                debug!(
                    timestamp = record.timestamp,
                    "[cs-03] Remote consent predates an undelivered local change"
                );
                self.check_from_pending(pending, now)
            }
            Ok(Some(record)) => {
                self.cache.write(&record);
                metrics::record_check(ConsentSource::CrossDomain.as_str());
                debug!(
                    domain = %record.domain,
                    timestamp = record.timestamp,
                    "[cs-03] Consent adopted from remote store"
                );
                ConsentCheck::found(record, ConsentSource::CrossDomain)
            }
            Ok(None) => self.check_from_pending(pending, now),
            Err(e) => {
                warn!(error = %e, "[cs-03] Remote consent check failed");
                metrics::record_remote_failure("check");
                self.check_from_pending(pending, now)
            }
        }
    }

    async fn save_consent(&self, preferences: ConsentPreferences) -> SaveOutcome {
        let record = self.new_record(preferences);

        // Local first: the user's browser reflects the choice regardless of
        // what the network does.
        let persisted_locally = self.cache.write(&record);

        match self.remote.save(&SaveRequest::from(&record)).await {
            Ok(response) => {
                self.set_pending(None);
                metrics::record_save(true);
                self.publish(ConsentEvent::Saved(ConsentChange::new(
                    record.preferences,
                    record.timestamp,
                    ChangeOrigin::ThisTab,
                )))
                .await;
                SaveOutcome {
                    success: true,
                    error: None,
                    record,
                    persisted_locally,
                    consent_id: response.consent_id,
                    applies_to: response.applies_to,
                }
            }
            Err(e) => {
                warn!(error = %e, "[cs-03] Remote consent save failed; kept locally");
                metrics::record_remote_failure("save");
                metrics::record_save(false);
                self.set_pending(Some(PendingPush::Save(record.clone())));
                SaveOutcome {
                    success: false,
                    error: Some(e.to_string()),
                    record,
                    persisted_locally,
                    consent_id: None,
                    applies_to: Vec::new(),
                }
            }
        }
    }

    async fn revoke_consent(&self) -> RevokeOutcome {
        let now = self.clock.now_ms();
        self.cache.clear();

        match self.remote.revoke(&self.revoke_request(now)).await {
            Ok(_) => {
                self.set_pending(None);
                metrics::record_revoke(true);
                self.publish(ConsentEvent::Revoked(ConsentChange::new(
                    ConsentPreferences::reject_all(),
                    now,
                    ChangeOrigin::ThisTab,
                )))
                .await;
                RevokeOutcome::ok()
            }
            Err(e) => {
                warn!(error = %e, "[cs-03] Remote consent revoke failed; cleared locally");
                metrics::record_remote_failure("revoke");
                metrics::record_revoke(false);
                self.set_pending(Some(PendingPush::Revoke { timestamp: now }));
                RevokeOutcome::failed(e.to_string())
            }
        }
    }

    async fn sync_consent(&self) -> SyncOutcome {
        let now = self.clock.now_ms();

        let remote = match self.fetch_remote(now).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(error = %e, "[cs-03] Periodic sync could not reach remote store");
                metrics::record_remote_failure("check");
                return SyncOutcome::Failed(e.to_string());
            }
        };

        if let Some(pending) = self.pending_push() {
            let remote_is_newer = remote
                .as_ref()
                .is_some_and(|r| r.timestamp > pending.timestamp());
            if !remote_is_newer {
                return self.push_pending(pending).await;
            }
            debug!(
                pending = pending.timestamp(),
                "[cs-03] Newer remote decision supersedes pending change"
            );
            self.resolve_pending(&pending);
        }

        let Some(remote) = remote else {
            return SyncOutcome::Unchanged;
        };

        let local = self.cache.read();
        let remote_is_newer = local.map_or(true, |l| remote.timestamp > l.timestamp);
        if !remote_is_newer {
            return SyncOutcome::Unchanged;
        }

        self.cache.write(&remote);
        metrics::SYNC_UPDATES.inc();
        info!(
            domain = %remote.domain,
            timestamp = remote.timestamp,
            "[cs-03] Newer cross-domain consent applied"
        );
        self.publish(ConsentEvent::Updated(ConsentChange::new(
            remote.preferences,
            remote.timestamp,
            ChangeOrigin::CrossDomain,
        )))
        .await;
        SyncOutcome::Updated(remote)
    }
}
