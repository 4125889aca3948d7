//! # Consent Runtime
//!
//! Composition root for the consent subsystems, plus the `consent-runtime`
//! command line tool.
//!
//! ## Subsystems
//!
//! | ID | Crate | Role |
//! |----|-------|------|
//! | 1 | `cs-01-jurisdiction-policy` | Default posture per regime |
//! | 2 | `cs-02-local-cache` | Durable per-device record |
//! | 3 | `cs-03-cross-domain-sync` | Remote store client, periodic sync |
//! | 4 | `cs-04-consent-controller` | Authoritative in-session state |
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration from the environment
//! - `wiring/` - Assembly and background task lifecycle

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod wiring;

pub use container::{ConfigError, RuntimeConfig};
pub use wiring::{ConsentRuntime, RuntimeError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
