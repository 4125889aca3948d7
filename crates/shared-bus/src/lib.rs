//! # Shared Bus - Event Bus for Consent State Changes
//!
//! Replaces window-level custom events (`consent-saved`, `consent-revoked`,
//! `consent-updated`) with an explicit, statically typed publish/subscribe
//! channel that can be exercised without a DOM.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Sync Client  │                    │ Banner / UI  │
//! │ Controller   │    publish()       │ Iframe gate  │
//! │              │ ──────┐            │ Analytics    │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! One bus lives per tab. Tabs do not share a bus; they converge through the
//! shared local storage and its change notifications.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ChangeOrigin, ConsentChange, ConsentEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
