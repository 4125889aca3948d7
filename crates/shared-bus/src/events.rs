//! # Consent Events
//!
//! Defines all event types that flow through the shared bus.
//! These replace the browser's `consent-saved`, `consent-revoked` and
//! `consent-updated` custom events with a statically typed channel.

use serde::{Deserialize, Serialize};
use shared_types::ConsentPreferences;

/// Where a consent change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeOrigin {
    /// The user acted in this tab.
    ThisTab,
    /// Another tab of the same origin wrote the shared cache.
    OtherTab,
    /// The remote store held a newer decision (another domain in the group).
    CrossDomain,
}

/// Payload carried by every consent event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentChange {
    /// Preferences in force after the change.
    pub preferences: ConsentPreferences,
    /// When the change was decided (epoch milliseconds).
    pub timestamp: u64,
    /// Where the change came from.
    pub origin: ChangeOrigin,
}

impl ConsentChange {
    /// Create a change payload.
    #[must_use]
    pub fn new(preferences: ConsentPreferences, timestamp: u64, origin: ChangeOrigin) -> Self {
        Self {
            preferences,
            timestamp,
            origin,
        }
    }
}

/// All events that can be published to the event bus.
///
/// Consumed by banner UI, iframe gating and analytics loaders that must wait
/// for a specific category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentEvent {
    /// The user made an explicit choice and it was stored.
    Saved(ConsentChange),

    /// Consent was withdrawn. Preferences are reject-all.
    Revoked(ConsentChange),

    /// A newer decision arrived from another tab or another domain.
    Updated(ConsentChange),
}

impl ConsentEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Saved(_) => EventTopic::Saved,
            Self::Revoked(_) => EventTopic::Revoked,
            Self::Updated(_) => EventTopic::Updated,
        }
    }

    /// Application event name.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Saved(_) => "consent-saved",
            Self::Revoked(_) => "consent-revoked",
            Self::Updated(_) => "consent-updated",
        }
    }

    /// The change payload.
    #[must_use]
    pub fn change(&self) -> &ConsentChange {
        match self {
            Self::Saved(c) | Self::Revoked(c) | Self::Updated(c) => c,
        }
    }

    /// Where the change came from.
    #[must_use]
    pub fn origin(&self) -> ChangeOrigin {
        self.change().origin
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// `consent-saved`.
    Saved,
    /// `consent-revoked`.
    Revoked,
    /// `consent-updated`.
    Updated,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Origins to include. Empty means all origins.
    pub origins: Vec<ChangeOrigin>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            origins: Vec::new(),
        }
    }

    /// Create a filter for events from specific origins.
    #[must_use]
    pub fn from_origins(origins: Vec<ChangeOrigin>) -> Self {
        Self {
            topics: Vec::new(),
            origins,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ConsentEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let origin_match = self.origins.is_empty() || self.origins.contains(&event.origin());

        topic_match && origin_match
    }
}
