//! # Inbound Ports
//!
//! API trait the UI (banner, iframe gating, analytics bootstrap) consumes.

use async_trait::async_trait;
use cs_01_jurisdiction_policy::JurisdictionConfig;
use cs_03_cross_domain_sync::RevokeOutcome;
use shared_types::{ConsentCategory, ConsentPreferences, Jurisdiction, PreferencesUpdate};

use crate::domain::{ConsentSnapshot, DecisionState};

/// Consent state API - inbound port.
#[async_trait]
pub trait ConsentStateApi: Send + Sync {
    /// Resolve the starting state: review flag, local cache, remote store,
    /// jurisdiction defaults (first match wins).
    async fn initialize(&self) -> ConsentSnapshot;

    /// Merge a partial choice and record it as the user's decision.
    async fn set_consent(&self, update: PreferencesUpdate) -> ConsentSnapshot;

    /// "Accept All".
    async fn accept_all(&self) -> ConsentSnapshot;

    /// "Reject All": only the necessary category.
    async fn reject_all(&self) -> ConsentSnapshot;

    /// "Save selection" with every optional category given.
    async fn save_selection(&self, preferences: ConsentPreferences) -> ConsentSnapshot;

    /// Withdraw the decision and fall back to defaults.
    async fn revoke(&self) -> RevokeOutcome;

    /// Re-open the banner with the current choices pre-filled.
    fn request_review(&self) -> ConsentSnapshot;

    /// Whether processing in `category` is allowed right now.
    fn has_consent_for(&self, category: ConsentCategory) -> bool;

    /// Effective preferences.
    fn preferences(&self) -> ConsentPreferences;

    /// Full current view.
    fn snapshot(&self) -> ConsentSnapshot;

    /// Decision state.
    fn decision(&self) -> DecisionState;

    /// Jurisdiction selected for this session.
    fn jurisdiction(&self) -> Jurisdiction;

    /// Policy for the selected jurisdiction.
    fn policy(&self) -> &'static JurisdictionConfig;

    /// Whether the banner must render.
    fn should_show_banner(&self) -> bool {
        self.decision().shows_banner()
    }
}
