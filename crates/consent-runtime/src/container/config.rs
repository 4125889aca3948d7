//! # Runtime Configuration
//!
//! Read from `CONSENT_*` environment variables, then overridden by command
//! line flags.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `CONSENT_API_ENDPOINT` | Remote store base URL; unset disables sync |
//! | `CONSENT_ORG_ID` | Organization id |
//! | `CONSENT_POLICY_VERSION` | Privacy policy version |
//! | `CONSENT_DOMAIN` | Current hostname |
//! | `CONSENT_DOMAIN_GROUP` | Comma-separated domains sharing consent |
//! | `CONSENT_JURISDICTION` | `GDPR`, `CCPA`, `DPDP` or `DEFAULT` |
//! | `CONSENT_SYNC_INTERVAL_SECS` | Periodic sync interval |
//! | `CONSENT_DATA_DIR` | Directory for the storage file |

use std::path::PathBuf;

use cs_01_jurisdiction_policy::PrivacySignals;
use cs_03_cross_domain_sync::SyncConfig;
use cs_04_consent_controller::ControllerConfig;
use shared_types::Jurisdiction;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something unusable.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Sync client settings (also the source of controller identity).
    pub sync: SyncConfig,
    /// Whether a remote endpoint was configured.
    pub remote_sync_enabled: bool,
    /// Directory holding the storage file.
    pub data_dir: PathBuf,
    /// Session privacy signals.
    pub signals: PrivacySignals,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            remote_sync_enabled: false,
            data_dir: PathBuf::from("./consent-data"),
            signals: PrivacySignals::none(),
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(endpoint) = get("CONSENT_API_ENDPOINT") {
            config.sync.endpoint = endpoint;
            config.remote_sync_enabled = true;
        }
        if let Some(org) = get("CONSENT_ORG_ID") {
            config.sync.organization_id = org;
        }
        if let Some(version) = get("CONSENT_POLICY_VERSION") {
            config.sync.policy_version = version;
        }
        if let Some(domain) = get("CONSENT_DOMAIN") {
            config.sync.domain = domain;
        }
        if let Some(group) = get("CONSENT_DOMAIN_GROUP") {
            config.sync.domain_group = group
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(code) = get("CONSENT_JURISDICTION") {
            config.sync.jurisdiction_override = Some(parse_jurisdiction(&code)?);
        }
        if let Some(secs) = get("CONSENT_SYNC_INTERVAL_SECS") {
            config.sync.sync_interval_secs = secs
                .parse()
                .ok()
                .filter(|s: &u64| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "CONSENT_SYNC_INTERVAL_SECS",
                    value: secs,
                })?;
        }
        if let Some(dir) = get("CONSENT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Controller settings derived from this configuration.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            remote_sync_enabled: self.remote_sync_enabled,
            ..ControllerConfig::from_sync_config(&self.sync)
        }
    }
}

/// Parse a jurisdiction code strictly: unknown codes are rejected rather
/// than silently mapped to `DEFAULT`.
pub fn parse_jurisdiction(code: &str) -> Result<Jurisdiction, ConfigError> {
    let jurisdiction = Jurisdiction::from_code(code);
    if jurisdiction.code().eq_ignore_ascii_case(code.trim()) {
        Ok(jurisdiction)
    } else {
        Err(ConfigError::InvalidValue {
            var: "CONSENT_JURISDICTION",
            value: code.to_string(),
        })
    }
}
