//! # Wire Types
//!
//! JSON bodies exchanged with the remote consent store (camelCase).
//!
//! | Route | Request | Response |
//! |-------|---------|----------|
//! | `GET /check` | - | `CheckResponse` (404 = no record) |
//! | `POST /save` | `SaveRequest` | `SaveResponse` |
//! | `POST /revoke` | `RevokeRequest` | `RevokeResponse` |

use serde::{Deserialize, Serialize};
use shared_types::{ConsentPreferences, ConsentRecord};

/// Body of `GET /check`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// The store holds a record for this anonymous user.
    pub has_consent: bool,
    /// Stored preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<ConsentPreferences>,
    /// When the decision was made (epoch ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Domain the decision was made on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Policy version consented to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Anonymous user id assigned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl CheckResponse {
    /// Response for a stored record.
    pub fn from_record(record: &ConsentRecord) -> Self {
        Self {
            has_consent: true,
            preferences: Some(record.preferences),
            timestamp: Some(record.timestamp),
            domain: Some(record.domain.clone()),
            version: Some(record.version.clone()),
            user_id: record.user_id.clone(),
        }
    }

    /// Rebuild the record, if the response carries a complete decision.
    ///
    /// The store does not echo the organization; `organization_id` is used.
    /// Missing domain or version fall back to `fallback_domain` and
    /// `fallback_version`.
    pub fn into_record(
        self,
        organization_id: &str,
        fallback_domain: &str,
        fallback_version: &str,
    ) -> Option<ConsentRecord> {
        if !self.has_consent {
            return None;
        }
        let preferences = self.preferences?;
        let timestamp = self.timestamp?;
        let record = ConsentRecord::new(
            preferences,
            timestamp,
            self.domain.unwrap_or_else(|| fallback_domain.to_string()),
            organization_id,
            self.version.unwrap_or_else(|| fallback_version.to_string()),
        );
        Some(record.with_user_id(self.user_id))
    }
}

/// Body of `POST /save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Chosen preferences.
    pub preferences: ConsentPreferences,
    /// Decision time (epoch ms).
    pub timestamp: u64,
    /// Domain the choice was made on.
    pub domain: String,
    /// Organization id.
    pub organization_id: String,
    /// Policy version.
    pub version: String,
}

impl From<&ConsentRecord> for SaveRequest {
    fn from(record: &ConsentRecord) -> Self {
        Self {
            preferences: record.preferences,
            timestamp: record.timestamp,
            domain: record.domain.clone(),
            organization_id: record.organization_id.clone(),
            version: record.version.clone(),
        }
    }
}

/// Body answering `POST /save`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Whether the store accepted the record.
    pub success: bool,
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// Id of the stored record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_id: Option<String>,
    /// Domains the decision now applies to.
    #[serde(default)]
    pub applies_to: Vec<String>,
}

/// Body of `POST /revoke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    /// Domain the revocation was made on.
    pub domain: String,
    /// Organization id.
    pub organization_id: String,
    /// Revocation time (epoch ms).
    pub timestamp: u64,
}

/// Body answering `POST /revoke`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeResponse {
    /// Whether the store removed the record.
    pub success: bool,
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
}
