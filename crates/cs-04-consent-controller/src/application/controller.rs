//! # Consent State Controller
//!
//! Owns the in-memory "current consent" for one tab. Mediates every write,
//! follows other tabs through storage change notifications and other domains
//! through cross-domain `consent-updated` events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{
    ChangeOrigin, ConsentChange, ConsentEvent, EventFilter, EventTopic, InMemoryEventBus,
};
use shared_types::{
    Clock, ConsentCategory, ConsentPreferences, ConsentRecord, Jurisdiction, PreferencesUpdate,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use consent_telemetry::metrics;
use cs_01_jurisdiction_policy::{JurisdictionConfig, PolicySelector, PrivacySignals};
use cs_02_local_cache::{CacheChange, LocalConsentCache, StorageChange};
use cs_03_cross_domain_sync::{ConsentSource, CrossDomainSyncApi, RevokeOutcome};

use crate::application::handle::ControllerHandle;
use crate::config::ControllerConfig;
use crate::domain::{ConsentSnapshot, ControllerError, DecisionState};
use crate::ports::ConsentStateApi;

#[derive(Debug, Clone)]
struct ControllerState {
    preferences: ConsentPreferences,
    decision: DecisionState,
    source: Option<ConsentSource>,
    timestamp: Option<u64>,
    /// Time of the last change adopted (decision or revoke), for ordering
    /// changes arriving from other tabs.
    last_change_ms: u64,
}

impl ControllerState {
    fn defaults(preferences: ConsentPreferences, decision: DecisionState, at_ms: u64) -> Self {
        Self {
            preferences,
            decision,
            source: None,
            timestamp: None,
            last_change_ms: at_ms,
        }
    }

    fn decided(record: &ConsentRecord, source: ConsentSource) -> Self {
        Self {
            preferences: record.preferences,
            decision: DecisionState::Decided,
            source: Some(source),
            timestamp: Some(record.timestamp),
            last_change_ms: record.timestamp,
        }
    }
}

/// Consent State Controller - one per tab.
pub struct ConsentStateController {
    config: ControllerConfig,
    cache: LocalConsentCache,
    sync: Option<Arc<dyn CrossDomainSyncApi>>,
    bus: Arc<InMemoryEventBus>,
    clock: Arc<dyn Clock>,
    policy: PolicySelector,
    state: RwLock<ControllerState>,
    started: AtomicBool,
}

impl ConsentStateController {
    /// Create a controller. The jurisdiction is selected here, once.
    ///
    /// Without a sync client the controller runs local-only.
    pub fn new(
        config: ControllerConfig,
        cache: LocalConsentCache,
        sync: Option<Arc<dyn CrossDomainSyncApi>>,
        bus: Arc<InMemoryEventBus>,
        clock: Arc<dyn Clock>,
        signals: PrivacySignals,
    ) -> Self {
        let policy = PolicySelector::select(config.jurisdiction_override, signals);
        let state = ControllerState::defaults(
            policy.default_preferences(),
            DecisionState::FirstVisit,
            0,
        );
        info!(
            jurisdiction = %policy.jurisdiction(),
            remote_sync = sync.is_some() && config.remote_sync_enabled,
            "[cs-04] Consent controller created"
        );
        Self {
            config,
            cache,
            sync,
            bus,
            clock,
            policy,
            state: RwLock::new(state),
            started: AtomicBool::new(false),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The event bus consent changes are announced on.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// `has_consent_for` with the category given by name.
    pub fn has_consent_for_name(&self, category: &str) -> Result<bool, ControllerError> {
        let category: ConsentCategory = category.parse()?;
        Ok(self.has_consent_for(category))
    }

    fn defaults(&self) -> ConsentPreferences {
        self.policy.default_preferences()
    }

    fn remote_sync(&self) -> Option<&Arc<dyn CrossDomainSyncApi>> {
        self.sync
            .as_ref()
            .filter(|_| self.config.remote_sync_enabled)
    }

    fn replace_state(&self, state: ControllerState) -> ConsentSnapshot {
        let mut guard = self.state.write();
        *guard = state;
        self.snapshot_of(&guard)
    }

    fn snapshot_of(&self, state: &ControllerState) -> ConsentSnapshot {
        ConsentSnapshot {
            preferences: state.preferences,
            decision: state.decision,
            jurisdiction: self.policy.jurisdiction(),
            source: state.source,
            timestamp: state.timestamp,
        }
    }

    /// Record `preferences` as the user's explicit choice.
    async fn commit_choice(&self, preferences: ConsentPreferences) -> ConsentSnapshot {
        let record = match self.remote_sync() {
            // Writes locally before the remote call; the remote is best-effort.
            Some(sync) => sync.save_consent(preferences).await.record,
            None => {
                let record = ConsentRecord::new(
                    preferences,
                    self.clock.now_ms(),
                    self.config.domain.clone(),
                    self.config.organization_id.clone(),
                    self.config.policy_version.clone(),
                );
                self.cache.write(&record);
                metrics::record_save(false);
                self.bus.publish_now(ConsentEvent::Saved(ConsentChange::new(
                    record.preferences,
                    record.timestamp,
                    ChangeOrigin::ThisTab,
                )));
                record
            }
        };

        debug!(
            preferences = ?record.preferences,
            timestamp = record.timestamp,
            "[cs-04] Consent decided"
        );
        self.replace_state(ControllerState::decided(&record, ConsentSource::Local))
    }

    /// Adopt a change another tab made to the shared storage.
    ///
    /// Returns whether the in-memory state changed. A replacement older than
    /// the current decision is ignored.
    pub fn apply_storage_change(&self, change: &StorageChange) -> bool {
        let Some(cache_change) = self.cache.interpret_change(change) else {
            return false;
        };

        let event = match cache_change {
            CacheChange::Replaced(record) => {
                let mut state = self.state.write();
                if record.timestamp < state.last_change_ms {
                    debug!(
                        incoming = record.timestamp,
                        current = state.last_change_ms,
                        "[cs-04] Ignoring stale change from another tab"
                    );
                    return false;
                }
                *state = ControllerState::decided(&record, ConsentSource::Local);
                ConsentEvent::Updated(ConsentChange::new(
                    record.preferences,
                    record.timestamp,
                    ChangeOrigin::OtherTab,
                ))
            }
            CacheChange::Cleared => {
                let now = self.clock.now_ms();
                *self.state.write() =
                    ControllerState::defaults(self.defaults(), DecisionState::FirstVisit, now);
                ConsentEvent::Revoked(ConsentChange::new(
                    ConsentPreferences::reject_all(),
                    now,
                    ChangeOrigin::OtherTab,
                ))
            }
        };

        debug!(event = event.event_name(), writer = %change.writer, "[cs-04] Adopted change from another tab");
        self.bus.publish_now(event);
        true
    }

    /// Adopt a newer decision that periodic sync brought in from another
    /// domain. Other events are ignored.
    pub fn apply_remote_update(&self, event: &ConsentEvent) -> bool {
        let ConsentEvent::Updated(change) = event else {
            return false;
        };
        if change.origin != ChangeOrigin::CrossDomain {
            return false;
        }

        let mut state = self.state.write();
        if change.timestamp < state.last_change_ms {
            return false;
        }
        *state = ControllerState {
            preferences: change.preferences,
            decision: DecisionState::Decided,
            source: Some(ConsentSource::CrossDomain),
            timestamp: Some(change.timestamp),
            last_change_ms: change.timestamp,
        };
        debug!(timestamp = change.timestamp, "[cs-04] Adopted cross-domain decision");
        true
    }

    /// Start following other tabs and cross-domain updates in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self: Arc<Self>) -> Result<ControllerHandle, ControllerError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ControllerError::AlreadyStarted);
        }

        let mut watcher = self.cache.watch();
        let mut storage_open = watcher.is_some();
        let mut updates = self.bus.subscribe(EventFilter {
            topics: vec![EventTopic::Updated],
            origins: vec![ChangeOrigin::CrossDomain],
        });
        let mut updates_open = true;
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let controller = Arc::clone(&self);
        let task = tokio::spawn(async move {
            info!(
                cross_tab = storage_open,
                "[cs-04] Controller listening for consent changes"
            );
            loop {
                tokio::select! {
                    change = async {
                        match watcher.as_mut() {
                            Some(w) => w.changed().await,
                            None => None,
                        }
                    }, if storage_open => {
                        match change {
                            Some(change) => {
                                controller.apply_storage_change(&change);
                            }
                            None => {
                                warn!("[cs-04] Storage change feed closed");
                                storage_open = false;
                            }
                        }
                    }
                    event = updates.recv(), if updates_open => {
                        match event {
                            Some(event) => {
                                controller.apply_remote_update(&event);
                            }
                            None => updates_open = false,
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("[cs-04] Shutdown signal received");
                            break;
                        }
                    }
                }
            }
        });

        Ok(ControllerHandle::new(shutdown_tx, task))
    }
}

#[async_trait]
impl ConsentStateApi for ConsentStateController {
    async fn initialize(&self) -> ConsentSnapshot {
        let now = self.clock.now_ms();

        if self.cache.take_review_flag() {
            let preferences = self.cache.read_backup().unwrap_or_else(|| self.defaults());
            let mut state =
                ControllerState::defaults(preferences, DecisionState::ReviewRequested, now);
            if let Some(record) = self.cache.read() {
                state.last_change_ms = record.timestamp;
            }
            info!("[cs-04] Review requested; showing banner with previous choices");
            return self.replace_state(state);
        }

        if let Some(record) = self.cache.read_valid(now) {
            debug!(timestamp = record.timestamp, "[cs-04] Using cached consent");
            return self.replace_state(ControllerState::decided(&record, ConsentSource::Local));
        }

        if let Some(sync) = self.remote_sync() {
            let check = sync.check_consent().await;
            if let (true, Some(record), Some(source)) =
                (check.has_consent, check.record.as_ref(), check.source)
            {
                debug!(source = source.as_str(), "[cs-04] Consent resolved by sync client");
                return self.replace_state(ControllerState::decided(record, source));
            }
        }

        debug!(jurisdiction = %self.policy.jurisdiction(), "[cs-04] No decision; using defaults");
        self.replace_state(ControllerState::defaults(
            self.defaults(),
            DecisionState::FirstVisit,
            0,
        ))
    }

    async fn set_consent(&self, update: PreferencesUpdate) -> ConsentSnapshot {
        let preferences = self.preferences().with(update);
        self.commit_choice(preferences).await
    }

    async fn accept_all(&self) -> ConsentSnapshot {
        self.commit_choice(ConsentPreferences::accept_all()).await
    }

    async fn reject_all(&self) -> ConsentSnapshot {
        self.commit_choice(ConsentPreferences::reject_all()).await
    }

    async fn save_selection(&self, preferences: ConsentPreferences) -> ConsentSnapshot {
        self.commit_choice(preferences).await
    }

    async fn revoke(&self) -> RevokeOutcome {
        let outcome = match self.remote_sync() {
            Some(sync) => sync.revoke_consent().await,
            None => {
                self.cache.clear();
                metrics::record_revoke(false);
                self.bus.publish_now(ConsentEvent::Revoked(ConsentChange::new(
                    ConsentPreferences::reject_all(),
                    self.clock.now_ms(),
                    ChangeOrigin::ThisTab,
                )));
                RevokeOutcome::ok()
            }
        };

        self.replace_state(ControllerState::defaults(
            self.defaults(),
            DecisionState::FirstVisit,
            self.clock.now_ms(),
        ));
        info!(remote_ok = outcome.success, "[cs-04] Consent revoked");
        outcome
    }

    fn request_review(&self) -> ConsentSnapshot {
        let mut state = self.state.write();
        self.cache.write_backup(state.preferences);
        self.cache.request_review();
        state.decision = DecisionState::ReviewRequested;
        self.snapshot_of(&state)
    }

    fn has_consent_for(&self, category: ConsentCategory) -> bool {
        self.state.read().preferences.allows(category)
    }

    fn preferences(&self) -> ConsentPreferences {
        self.state.read().preferences
    }

    fn snapshot(&self) -> ConsentSnapshot {
        self.snapshot_of(&self.state.read())
    }

    fn decision(&self) -> DecisionState {
        self.state.read().decision
    }

    fn jurisdiction(&self) -> Jurisdiction {
        self.policy.jurisdiction()
    }

    fn policy(&self) -> &'static JurisdictionConfig {
        self.policy.config()
    }
}
