//! # Core Domain Entities
//!
//! Defines the consent entities used across subsystems.
//!
//! ## Clusters
//!
//! - **Preferences**: `ConsentCategory`, `ConsentPreferences`, `PreferencesUpdate`
//! - **Records**: `ConsentRecord` and its validity window

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// One day in milliseconds.
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// A consent record is valid for 365 days after its timestamp.
pub const CONSENT_VALIDITY_MS: u64 = 365 * DAY_MS;

// =============================================================================
// CLUSTER A: PREFERENCES
// =============================================================================

/// A consent category, the unit of opt-in granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    /// Strictly necessary processing. Always granted.
    Necessary,
    /// Remembered UI preferences (theme, language).
    Preferences,
    /// Usage analytics.
    Analytics,
    /// Advertising and cross-site marketing.
    Marketing,
}

impl ConsentCategory {
    /// Every category, in display order.
    pub const ALL: [ConsentCategory; 4] = [
        ConsentCategory::Necessary,
        ConsentCategory::Preferences,
        ConsentCategory::Analytics,
        ConsentCategory::Marketing,
    ];

    /// The categories a user can toggle.
    pub const OPTIONAL: [ConsentCategory; 3] = [
        ConsentCategory::Preferences,
        ConsentCategory::Analytics,
        ConsentCategory::Marketing,
    ];

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necessary => "necessary",
            Self::Preferences => "preferences",
            Self::Analytics => "analytics",
            Self::Marketing => "marketing",
        }
    }
}

impl fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "necessary" => Ok(Self::Necessary),
            "preferences" => Ok(Self::Preferences),
            "analytics" => Ok(Self::Analytics),
            "marketing" => Ok(Self::Marketing),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

/// A user's choice per consent category.
///
/// The necessary category is not stored: it is always granted, always
/// reported by [`ConsentPreferences::necessary`] and always serialized as
/// `"necessary": true`. An incoming `"necessary": false` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "PreferencesWire", into = "PreferencesWire")]
pub struct ConsentPreferences {
    /// Remembered UI preferences.
    pub preferences: bool,
    /// Usage analytics.
    pub analytics: bool,
    /// Advertising and marketing.
    pub marketing: bool,
}

impl ConsentPreferences {
    /// Build preferences from the three optional flags.
    #[must_use]
    pub const fn new(preferences: bool, analytics: bool, marketing: bool) -> Self {
        Self {
            preferences,
            analytics,
            marketing,
        }
    }

    /// Every category granted ("Accept All").
    #[must_use]
    pub const fn accept_all() -> Self {
        Self::new(true, true, true)
    }

    /// Only the necessary category granted ("Reject All").
    #[must_use]
    pub const fn reject_all() -> Self {
        Self::new(false, false, false)
    }

    /// The necessary category is always granted.
    #[must_use]
    pub const fn necessary(&self) -> bool {
        true
    }

    /// Whether processing in `category` is allowed.
    #[must_use]
    pub fn allows(&self, category: ConsentCategory) -> bool {
        match category {
            ConsentCategory::Necessary => true,
            ConsentCategory::Preferences => self.preferences,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Marketing => self.marketing,
        }
    }

    /// Return a copy with `update` merged in.
    #[must_use]
    pub fn with(self, update: PreferencesUpdate) -> Self {
        update.apply(self)
    }

    /// Categories currently granted, necessary included.
    #[must_use]
    pub fn granted(&self) -> Vec<ConsentCategory> {
        ConsentCategory::ALL
            .into_iter()
            .filter(|c| self.allows(*c))
            .collect()
    }
}

/// JSON shape of `ConsentPreferences` as stored locally and sent remotely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PreferencesWire {
    #[serde(default = "always_true")]
    necessary: bool,
    #[serde(default)]
    preferences: bool,
    #[serde(default)]
    analytics: bool,
    #[serde(default)]
    marketing: bool,
}

fn always_true() -> bool {
    true
}

impl From<PreferencesWire> for ConsentPreferences {
    fn from(wire: PreferencesWire) -> Self {
        Self::new(wire.preferences, wire.analytics, wire.marketing)
    }
}

impl From<ConsentPreferences> for PreferencesWire {
    fn from(prefs: ConsentPreferences) -> Self {
        Self {
            necessary: true,
            preferences: prefs.preferences,
            analytics: prefs.analytics,
            marketing: prefs.marketing,
        }
    }
}

/// A partial update to `ConsentPreferences`.
///
/// `None` leaves the current value untouched. There is deliberately no way
/// to express a change to the necessary category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    /// New value for the preferences category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<bool>,
    /// New value for the analytics category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    /// New value for the marketing category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<bool>,
}

impl PreferencesUpdate {
    /// Update that sets a single category.
    ///
    /// Setting `Necessary` is a no-op.
    #[must_use]
    pub fn set(category: ConsentCategory, granted: bool) -> Self {
        Self::default().and(category, granted)
    }

    /// Add another category change to this update.
    #[must_use]
    pub fn and(mut self, category: ConsentCategory, granted: bool) -> Self {
        match category {
            ConsentCategory::Necessary => {}
            ConsentCategory::Preferences => self.preferences = Some(granted),
            ConsentCategory::Analytics => self.analytics = Some(granted),
            ConsentCategory::Marketing => self.marketing = Some(granted),
        }
        self
    }

    /// Update that replaces every optional category.
    #[must_use]
    pub fn replace_all(prefs: ConsentPreferences) -> Self {
        Self {
            preferences: Some(prefs.preferences),
            analytics: Some(prefs.analytics),
            marketing: Some(prefs.marketing),
        }
    }

    /// True if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preferences.is_none() && self.analytics.is_none() && self.marketing.is_none()
    }

    /// Merge this update into `prefs`.
    #[must_use]
    pub fn apply(&self, prefs: ConsentPreferences) -> ConsentPreferences {
        ConsentPreferences {
            preferences: self.preferences.unwrap_or(prefs.preferences),
            analytics: self.analytics.unwrap_or(prefs.analytics),
            marketing: self.marketing.unwrap_or(prefs.marketing),
        }
    }
}

// =============================================================================
// CLUSTER B: RECORDS
// =============================================================================

/// A user's explicit consent decision plus its metadata.
///
/// Created on an explicit choice or when a valid record is fetched from the
/// remote store. Never patched in place: a new record replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// The decision itself.
    pub preferences: ConsentPreferences,
    /// When the decision was made (epoch milliseconds).
    pub timestamp: u64,
    /// Hostname the decision was made on.
    pub domain: String,
    /// Organization the consent was given to.
    pub organization_id: String,
    /// Policy version the user agreed to.
    pub version: String,
    /// Anonymous user id assigned by the remote store, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ConsentRecord {
    /// Create a record for a decision taken at `timestamp`.
    pub fn new(
        preferences: ConsentPreferences,
        timestamp: u64,
        domain: impl Into<String>,
        organization_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            preferences,
            timestamp,
            domain: domain.into(),
            organization_id: organization_id.into(),
            version: version.into(),
            user_id: None,
        }
    }

    /// Attach the anonymous user id.
    #[must_use]
    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Age of the record at `now_ms`. Future timestamps count as age zero.
    #[must_use]
    pub fn age_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }

    /// A record is valid only while `now - timestamp < 365 days`.
    #[must_use]
    pub fn is_valid_at(&self, now_ms: u64) -> bool {
        self.age_at(now_ms) < CONSENT_VALIDITY_MS
    }

    /// First instant at which the record is no longer valid.
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.timestamp.saturating_add(CONSENT_VALIDITY_MS)
    }
}
