//! # Local Consent Cache
//!
//! Persists the consent decision for the current domain under fixed keys.
//! Every operation fails soft: storage and decoding errors are logged and
//! reported as "nothing cached" or `false`, never as an error.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use shared_types::{ConsentPreferences, ConsentRecord};
use tracing::{debug, error, warn};

use crate::domain::{CacheChange, StorageChange};
use crate::ports::{KeyValueStorage, StorageWatcher};

/// Key holding the current `ConsentRecord`.
pub const CONSENT_KEY: &str = "privacy_consent";

/// Key holding the last known preferences, used to pre-fill settings.
pub const BACKUP_KEY: &str = "privacy_consent_backup";

/// One-shot flag: the user asked to review their decision.
pub const REVIEW_KEY: &str = "privacy_consent_review";

/// A local change the remote store has not acknowledged yet. Kept apart
/// from the record so that clearing consent leaves it in place.
pub const PENDING_KEY: &str = "privacy_consent_pending";

const REVIEW_FLAG_VALUE: &str = "1";

/// Consent persistence over any [`KeyValueStorage`].
#[derive(Clone)]
pub struct LocalConsentCache {
    storage: Arc<dyn KeyValueStorage>,
}

impl LocalConsentCache {
    /// Wrap a storage backend.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The cached record, valid or not.
    #[must_use]
    pub fn read(&self) -> Option<ConsentRecord> {
        let raw = self.read_key(CONSENT_KEY)?;
        match serde_json::from_str::<ConsentRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "[cs-02] Cached consent is corrupt, ignoring");
                None
            }
        }
    }

    /// The cached record if it is still valid at `now_ms`.
    #[must_use]
    pub fn read_valid(&self, now_ms: u64) -> Option<ConsentRecord> {
        let record = self.read()?;
        if record.is_valid_at(now_ms) {
            Some(record)
        } else {
            debug!(
                timestamp = record.timestamp,
                now = now_ms,
                "[cs-02] Cached consent expired"
            );
            None
        }
    }

    /// Persist `record` and refresh the preferences backup.
    ///
    /// Returns whether the record was persisted. Failures are logged and
    /// counted, never raised.
    pub fn write(&self, record: &ConsentRecord) -> bool {
        let encoded = match serde_json::to_string(record) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "[cs-02] Failed to encode consent record");
                consent_telemetry::metrics::CACHE_WRITE_FAILURES.inc();
                return false;
            }
        };

        if let Err(e) = self.storage.set(CONSENT_KEY, &encoded) {
            error!(error = %e, "[cs-02] Failed to persist consent record");
            consent_telemetry::metrics::CACHE_WRITE_FAILURES.inc();
            return false;
        }

        self.write_backup(record.preferences);
        debug!(
            timestamp = record.timestamp,
            domain = %record.domain,
            "[cs-02] Consent cached"
        );
        true
    }

    /// Remove the record and the backup.
    pub fn clear(&self) -> bool {
        let mut cleared = true;
        for key in [CONSENT_KEY, BACKUP_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!(key, error = %e, "[cs-02] Failed to clear cached consent");
                cleared = false;
            }
        }
        cleared
    }

    /// Last known preferences, if any.
    #[must_use]
    pub fn read_backup(&self) -> Option<ConsentPreferences> {
        let raw = self.read_key(BACKUP_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| warn!(error = %e, "[cs-02] Preferences backup is corrupt, ignoring"))
            .ok()
    }

    /// Store `prefs` as the preferences backup.
    pub fn write_backup(&self, prefs: ConsentPreferences) -> bool {
        let encoded = match serde_json::to_string(&prefs) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "[cs-02] Failed to encode preferences backup");
                return false;
            }
        };
        match self.storage.set(BACKUP_KEY, &encoded) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "[cs-02] Failed to persist preferences backup");
                false
            }
        }
    }

    /// Raise the one-shot review flag. It survives reloads until taken.
    pub fn request_review(&self) -> bool {
        match self.storage.set(REVIEW_KEY, REVIEW_FLAG_VALUE) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "[cs-02] Failed to persist review request");
                false
            }
        }
    }

    /// Read and remove the review flag.
    pub fn take_review_flag(&self) -> bool {
        if self.read_key(REVIEW_KEY).is_none() {
            return false;
        }
        if let Err(e) = self.storage.remove(REVIEW_KEY) {
            warn!(error = %e, "[cs-02] Failed to clear review flag");
        }
        true
    }

    /// The persisted undelivered change, if any.
    #[must_use]
    pub fn read_pending<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.read_key(PENDING_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| warn!(error = %e, "[cs-02] Pending change is corrupt, ignoring"))
            .ok()
    }

    /// Persist an undelivered change so it outlives this process.
    pub fn write_pending<T: Serialize>(&self, pending: &T) -> bool {
        let encoded = match serde_json::to_string(pending) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "[cs-02] Failed to encode pending change");
                return false;
            }
        };
        match self.storage.set(PENDING_KEY, &encoded) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "[cs-02] Failed to persist pending change");
                consent_telemetry::metrics::CACHE_WRITE_FAILURES.inc();
                false
            }
        }
    }

    /// Forget the undelivered change.
    pub fn clear_pending(&self) -> bool {
        match self.storage.remove(PENDING_KEY) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "[cs-02] Failed to clear pending change");
                false
            }
        }
    }

    /// Decode a change made by another tab.
    ///
    /// Changes to other keys, and corrupt values, yield `None`.
    #[must_use]
    pub fn interpret_change(&self, change: &StorageChange) -> Option<CacheChange> {
        if change.key != CONSENT_KEY {
            return None;
        }
        match &change.new_value {
            None => Some(CacheChange::Cleared),
            Some(raw) => match serde_json::from_str::<ConsentRecord>(raw) {
                Ok(record) => Some(CacheChange::Replaced(record)),
                Err(e) => {
                    warn!(
                        writer = %change.writer,
                        error = %e,
                        "[cs-02] Ignoring corrupt consent from another tab"
                    );
                    None
                }
            },
        }
    }

    /// Watch for changes made by other tabs, if the backend supports it.
    #[must_use]
    pub fn watch(&self) -> Option<StorageWatcher> {
        self.storage.watch()
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "[cs-02] Storage read failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for LocalConsentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalConsentCache").finish_non_exhaustive()
    }
}
