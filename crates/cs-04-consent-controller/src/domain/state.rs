//! # Decision State
//!
//! "Undecided" has two causes that call for different banner behavior: a
//! first visit (nothing to pre-fill) and an explicit request to review an
//! existing decision (pre-fill from the backup).

use serde::{Deserialize, Serialize};
use shared_types::{ConsentPreferences, Jurisdiction};

use cs_03_cross_domain_sync::ConsentSource;

/// Whether the user has made a choice the banner must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionState {
    /// No valid decision exists.
    #[default]
    FirstVisit,
    /// The user asked to revisit their decision.
    ReviewRequested,
    /// A valid explicit decision is in force.
    Decided,
}

impl DecisionState {
    /// True once the user has chosen.
    pub fn is_decided(&self) -> bool {
        matches!(self, DecisionState::Decided)
    }

    /// The banner renders in every undecided state.
    pub fn shows_banner(&self) -> bool {
        !self.is_decided()
    }
}

/// Point-in-time view of the controller for UI consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentSnapshot {
    /// Effective preferences.
    pub preferences: ConsentPreferences,
    /// Decision state.
    pub decision: DecisionState,
    /// Jurisdiction selected for this session.
    pub jurisdiction: Jurisdiction,
    /// Where the decision came from; `None` for defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ConsentSource>,
    /// When the decision was made; `None` for defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl ConsentSnapshot {
    /// Whether the banner must render.
    pub fn show_banner(&self) -> bool {
        self.decision.shows_banner()
    }
}
