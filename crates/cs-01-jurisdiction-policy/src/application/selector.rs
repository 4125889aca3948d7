//! # Policy Selector
//!
//! Picks the jurisdiction once per session. A configured override wins over
//! detection.

use shared_types::{ConsentPreferences, Jurisdiction};
use tracing::debug;

use crate::algorithms::{detect_jurisdiction, get_jurisdiction_config};
use crate::domain::{JurisdictionConfig, PrivacySignals};

/// The policy selected for the current session.
#[derive(Debug, Clone)]
pub struct PolicySelector {
    jurisdiction: Jurisdiction,
    config: &'static JurisdictionConfig,
    signals: PrivacySignals,
}

impl PolicySelector {
    /// Select the policy from an optional override and the session signals.
    #[must_use]
    pub fn select(override_jurisdiction: Option<Jurisdiction>, signals: PrivacySignals) -> Self {
        let jurisdiction = override_jurisdiction.unwrap_or_else(|| detect_jurisdiction(&signals));
        debug!(
            jurisdiction = %jurisdiction,
            overridden = override_jurisdiction.is_some(),
            gpc = signals.global_privacy_control,
            "[cs-01] Jurisdiction selected"
        );
        Self {
            jurisdiction,
            config: get_jurisdiction_config(Some(jurisdiction)),
            signals,
        }
    }

    /// Selected jurisdiction.
    #[must_use]
    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    /// Selected static policy.
    #[must_use]
    pub fn config(&self) -> &'static JurisdictionConfig {
        self.config
    }

    /// Signals the selection was based on.
    #[must_use]
    pub fn signals(&self) -> &PrivacySignals {
        &self.signals
    }

    /// Default preferences for this session, with signals applied.
    #[must_use]
    pub fn default_preferences(&self) -> ConsentPreferences {
        self.config.defaults_for(&self.signals)
    }
}
