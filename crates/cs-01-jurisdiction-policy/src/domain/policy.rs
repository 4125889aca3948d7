//! # Policy Entities
//!
//! The static per-jurisdiction consent posture and banner copy.

use serde::Serialize;
use shared_types::{ConsentPreferences, Jurisdiction};

use super::signals::PrivacySignals;

/// Banner text variants for a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BannerCopy {
    /// Banner heading.
    pub title: &'static str,
    /// Body text.
    pub description: &'static str,
    /// Label of the accept-all button.
    pub accept_label: &'static str,
    /// Label of the reject-all / opt-out button.
    pub reject_label: &'static str,
    /// Label of the button that opens per-category settings.
    pub settings_label: &'static str,
}

/// Consent posture for one jurisdiction. Immutable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JurisdictionConfig {
    /// Which regime this entry describes.
    pub jurisdiction: Jurisdiction,
    /// Preferences assumed before the user decides.
    pub default_preferences: ConsentPreferences,
    /// Whether non-necessary processing needs an explicit opt-in first.
    pub requires_explicit_consent: bool,
    /// Whether a Global Privacy Control signal is honored as an opt-out.
    pub honors_gpc: bool,
    /// Banner text.
    pub copy: BannerCopy,
}

impl JurisdictionConfig {
    /// Default preferences with the caller's privacy signals applied.
    ///
    /// A honored GPC signal is an opt-out of sale/sharing, so marketing is
    /// forced off.
    #[must_use]
    pub fn defaults_for(&self, signals: &PrivacySignals) -> ConsentPreferences {
        let mut prefs = self.default_preferences;
        if self.honors_gpc && signals.global_privacy_control {
            prefs.marketing = false;
        }
        prefs
    }

    /// Whether the banner must be shown before any optional processing.
    #[must_use]
    pub fn banner_required(&self) -> bool {
        self.requires_explicit_consent
    }
}
