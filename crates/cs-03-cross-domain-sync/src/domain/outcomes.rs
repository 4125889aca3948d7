//! # Operation Outcomes
//!
//! Every public sync operation reports its result as a value. Network and
//! storage failures show up here, never as errors.

use serde::{Deserialize, Serialize};
use shared_types::{ConsentPreferences, ConsentRecord};

/// Where a consent decision was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsentSource {
    /// This domain's local cache.
    Local,
    /// The shared remote store.
    CrossDomain,
}

impl ConsentSource {
    /// Wire and metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentSource::Local => "local",
            ConsentSource::CrossDomain => "cross-domain",
        }
    }
}

/// Result of `check_consent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentCheck {
    /// A valid decision exists.
    pub has_consent: bool,
    /// The banner must be shown.
    pub show_banner: bool,
    /// The decided preferences.
    pub preferences: Option<ConsentPreferences>,
    /// Where the decision came from.
    pub source: Option<ConsentSource>,
    /// The full record.
    #[serde(skip)]
    pub record: Option<ConsentRecord>,
}

impl ConsentCheck {
    /// No valid decision anywhere: ask the user.
    pub fn no_consent() -> Self {
        Self {
            has_consent: false,
            show_banner: true,
            preferences: None,
            source: None,
            record: None,
        }
    }

    /// A valid decision was found.
    pub fn found(record: ConsentRecord, source: ConsentSource) -> Self {
        Self {
            has_consent: true,
            show_banner: false,
            preferences: Some(record.preferences),
            source: Some(source),
            record: Some(record),
        }
    }
}

/// Result of `save_consent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// The remote store accepted the record.
    pub success: bool,
    /// Why the remote save failed.
    pub error: Option<String>,
    /// The record that was built and cached.
    pub record: ConsentRecord,
    /// Whether the local write persisted.
    pub persisted_locally: bool,
    /// Id assigned by the remote store.
    pub consent_id: Option<String>,
    /// Domains the decision applies to, per the remote store.
    pub applies_to: Vec<String>,
}

/// Result of `revoke_consent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeOutcome {
    /// The remote store removed the record.
    pub success: bool,
    /// Why the remote revoke failed.
    pub error: Option<String>,
}

impl RevokeOutcome {
    /// Remote revoke succeeded.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Remote revoke failed; local state is already cleared.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Result of one `sync_consent` pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local state already reflects the newest decision.
    Unchanged,
    /// A newer remote decision replaced the local one.
    Updated(ConsentRecord),
    /// A change that previously failed to reach the store was delivered.
    PushedPending,
    /// The store could not be reached.
    Failed(String),
}

/// A local change the remote store has not acknowledged yet.
///
/// Persisted in the local cache so a later process can deliver it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingPush {
    /// A save whose `POST /save` failed.
    Save(ConsentRecord),
    /// A revoke whose `POST /revoke` failed.
    Revoke {
        /// When the user revoked (epoch ms).
        timestamp: u64,
    },
}

impl PendingPush {
    /// When the local change was made.
    pub fn timestamp(&self) -> u64 {
        match self {
            PendingPush::Save(record) => record.timestamp,
            PendingPush::Revoke { timestamp } => *timestamp,
        }
    }
}
