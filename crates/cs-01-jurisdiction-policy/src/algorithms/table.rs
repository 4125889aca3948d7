//! # Policy Table
//!
//! Static lookup from jurisdiction to consent posture. Total: every input,
//! including `None`, resolves to an entry.

use shared_types::{ConsentPreferences, Jurisdiction};

use crate::domain::{BannerCopy, JurisdictionConfig};

static GDPR: JurisdictionConfig = JurisdictionConfig {
    jurisdiction: Jurisdiction::Gdpr,
    default_preferences: ConsentPreferences::new(false, false, false),
    requires_explicit_consent: true,
    honors_gpc: true,
    copy: BannerCopy {
        title: "We value your privacy",
        description: "We use cookies to run this site and, with your consent, to remember \
                      your settings, measure usage and personalise marketing. You can change \
                      your choice at any time.",
        accept_label: "Accept all",
        reject_label: "Reject all",
        settings_label: "Customise",
    },
};

static CCPA: JurisdictionConfig = JurisdictionConfig {
    jurisdiction: Jurisdiction::Ccpa,
    default_preferences: ConsentPreferences::new(true, true, true),
    requires_explicit_consent: false,
    honors_gpc: true,
    copy: BannerCopy {
        title: "Your privacy choices",
        description: "We use cookies for analytics and advertising. California residents can \
                      opt out of the sale or sharing of personal information.",
        accept_label: "Accept",
        reject_label: "Do Not Sell or Share My Personal Information",
        settings_label: "Privacy choices",
    },
};

static DPDP: JurisdictionConfig = JurisdictionConfig {
    jurisdiction: Jurisdiction::Dpdp,
    default_preferences: ConsentPreferences::new(false, false, false),
    requires_explicit_consent: true,
    honors_gpc: false,
    copy: BannerCopy {
        title: "Consent notice",
        description: "We process personal data only for the purposes you agree to. \
                      Select the purposes you consent to below.",
        accept_label: "I consent to all",
        reject_label: "Only necessary",
        settings_label: "Choose purposes",
    },
};

static DEFAULT: JurisdictionConfig = JurisdictionConfig {
    jurisdiction: Jurisdiction::Default,
    default_preferences: ConsentPreferences::new(true, false, false),
    requires_explicit_consent: true,
    honors_gpc: true,
    copy: BannerCopy {
        title: "Cookie preferences",
        description: "We use cookies to improve your experience. Choose which optional \
                      cookies you allow.",
        accept_label: "Accept all",
        reject_label: "Reject optional",
        settings_label: "Settings",
    },
};

/// Look up the static policy for `jurisdiction`; `None` means `DEFAULT`.
#[must_use]
pub fn get_jurisdiction_config(jurisdiction: Option<Jurisdiction>) -> &'static JurisdictionConfig {
    match jurisdiction.unwrap_or_default() {
        Jurisdiction::Gdpr => &GDPR,
        Jurisdiction::Ccpa => &CCPA,
        Jurisdiction::Dpdp => &DPDP,
        Jurisdiction::Default => &DEFAULT,
    }
}

/// Every entry in the table.
#[must_use]
pub fn all_configs() -> [&'static JurisdictionConfig; 4] {
    [&GDPR, &CCPA, &DPDP, &DEFAULT]
}
