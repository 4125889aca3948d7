//! # Sync Client Configuration
//!
//! Supplied once at construction. There is no dynamic reconfiguration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::Jurisdiction;

/// Default periodic sync interval (5 minutes).
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;

/// Cross-domain sync client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the remote consent store (`.../api/consent`).
    pub endpoint: String,

    /// Organization the consent is recorded for.
    pub organization_id: String,

    /// Version of the privacy policy the user is consenting to.
    pub policy_version: String,

    /// Hostname of the current site.
    pub domain: String,

    /// Domains sharing one consent decision. Empty accepts any domain.
    pub domain_group: Vec<String>,

    /// Fixed jurisdiction, skipping detection.
    pub jurisdiction_override: Option<Jurisdiction>,

    /// Periodic resync interval in seconds.
    pub sync_interval_secs: u64,

    /// Whole-request deadline in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment deadline in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001/api/consent".to_string(),
            organization_id: "default-org".to_string(),
            policy_version: "1.0".to_string(),
            domain: "localhost".to_string(),
            domain_group: Vec::new(),
            jurisdiction_override: None,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            request_timeout_secs: 10,
            connect_timeout_secs: 3,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (short deadlines, fixed domain).
    pub fn for_testing() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9/api/consent".to_string(),
            organization_id: "test-org".to_string(),
            policy_version: "test".to_string(),
            domain: "a.example".to_string(),
            domain_group: vec!["a.example".to_string(), "b.example".to_string()],
            jurisdiction_override: None,
            sync_interval_secs: 1,
            request_timeout_secs: 2,
            connect_timeout_secs: 1,
        }
    }

    /// Periodic sync interval.
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    /// Whole-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Connect deadline.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Whether a record made on `domain` may be adopted here.
    pub fn shares_consent_with(&self, domain: &str) -> bool {
        if self.domain_group.is_empty() || domain.eq_ignore_ascii_case(&self.domain) {
            return true;
        }
        self.domain_group
            .iter()
            .any(|member| member.eq_ignore_ascii_case(domain))
    }
}
