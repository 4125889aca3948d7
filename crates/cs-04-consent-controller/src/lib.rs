//! # CS-04 Consent State Controller
//!
//! The single in-process source of truth for "what is the current consent,
//! has the user decided, and which jurisdiction applies".
//!
//! **Subsystem ID:** 4
//!
//! ## Initialization Order (first match wins)
//!
//! | Step | Condition | Result |
//! |------|-----------|--------|
//! | 1 | Review flag set | Backup or defaults, `ReviewRequested` |
//! | 2 | Valid local record | Record, `Decided` |
//! | 3 | Remote sync enabled and store has a valid record | Record, `Decided` |
//! | 4 | Otherwise | Jurisdiction defaults, `FirstVisit` |
//!
//! ## Change Propagation
//!
//! ```text
//! this tab ── set_consent ──→ cache + remote ──→ consent-saved (this-tab)
//! other tab ── storage change ──→ apply_storage_change ──→ consent-updated / consent-revoked (other-tab)
//! periodic sync ── consent-updated (cross-domain) ──→ apply_remote_update
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! cs-04-consent-controller/
//! ├── config.rs        # ControllerConfig
//! ├── domain/          # DecisionState, ConsentSnapshot, ControllerError
//! ├── ports/           # ConsentStateApi
//! └── application/     # ConsentStateController, ControllerHandle
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::{ConsentStateController, ControllerHandle};
pub use config::ControllerConfig;
pub use domain::{ConsentSnapshot, ControllerError, DecisionState};
pub use ports::ConsentStateApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
