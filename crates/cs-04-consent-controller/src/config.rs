//! # Controller Configuration

use serde::{Deserialize, Serialize};
use shared_types::Jurisdiction;

use cs_03_cross_domain_sync::SyncConfig;

/// Consent state controller configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Hostname of the current site.
    pub domain: String,

    /// Organization the consent is recorded for.
    pub organization_id: String,

    /// Privacy policy version.
    pub policy_version: String,

    /// Fixed jurisdiction, skipping detection.
    pub jurisdiction_override: Option<Jurisdiction>,

    /// Ask the remote store when the local cache has nothing.
    pub remote_sync_enabled: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            organization_id: "default-org".to_string(),
            policy_version: "1.0".to_string(),
            jurisdiction_override: None,
            remote_sync_enabled: true,
        }
    }
}

impl ControllerConfig {
    /// Create a config for testing (local only).
    pub fn for_testing() -> Self {
        Self {
            domain: "a.example".to_string(),
            organization_id: "test-org".to_string(),
            policy_version: "test".to_string(),
            jurisdiction_override: None,
            remote_sync_enabled: false,
        }
    }

    /// Derive the controller settings from the sync client's.
    pub fn from_sync_config(sync: &SyncConfig) -> Self {
        Self {
            domain: sync.domain.clone(),
            organization_id: sync.organization_id.clone(),
            policy_version: sync.policy_version.clone(),
            jurisdiction_override: sync.jurisdiction_override,
            remote_sync_enabled: true,
        }
    }
}
