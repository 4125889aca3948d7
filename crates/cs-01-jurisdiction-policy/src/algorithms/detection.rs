//! # Jurisdiction Detection
//!
//! Pure functions from explicit privacy signals to a jurisdiction.
//!
//! Precedence:
//! 1. GPC signal present ⇒ `CCPA`
//! 2. Region hint (external geo lookup) ⇒ mapped regime, if any
//! 3. Otherwise ⇒ `DEFAULT`

use shared_types::Jurisdiction;

use crate::domain::PrivacySignals;

/// EU member states plus the EEA and the UK, which keeps GDPR in domestic law.
const GDPR_REGIONS: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "IS", "LI", "NO",
    "GB",
];

/// Detect the jurisdiction for a session.
#[must_use]
pub fn detect_jurisdiction(signals: &PrivacySignals) -> Jurisdiction {
    if signals.global_privacy_control {
        return Jurisdiction::Ccpa;
    }

    signals
        .region
        .as_deref()
        .and_then(jurisdiction_for_region)
        .unwrap_or(Jurisdiction::Default)
}

/// Map a region hint (`DE`, `in`, `US-CA`) to a jurisdiction.
#[must_use]
pub fn jurisdiction_for_region(region: &str) -> Option<Jurisdiction> {
    let region = region.trim().to_ascii_uppercase();
    let (country, subdivision) = match region.split_once('-') {
        Some((c, s)) => (c, Some(s)),
        None => (region.as_str(), None),
    };

    match (country, subdivision) {
        ("US", Some("CA")) => Some(Jurisdiction::Ccpa),
        ("IN", _) => Some(Jurisdiction::Dpdp),
        (c, _) if GDPR_REGIONS.contains(&c) => Some(Jurisdiction::Gdpr),
        _ => None,
    }
}
