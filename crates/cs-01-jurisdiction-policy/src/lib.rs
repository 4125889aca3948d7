//! # CS-01 Jurisdiction Policy
//!
//! Static lookup from a detected regulatory regime to default consent
//! posture, opt-in requirement, GPC handling and banner copy.
//!
//! **Subsystem ID:** 1
//! **Side effects:** none (pure functions over a static table)
//!
//! ## Detection
//!
//! | Input | Result |
//! |-------|--------|
//! | GPC signal present | `CCPA` |
//! | Region hint in EU/EEA/UK | `GDPR` |
//! | Region hint `IN` | `DPDP` |
//! | Region hint `US-CA` | `CCPA` |
//! | Anything else | `DEFAULT` |
//!
//! ## Module Structure
//!
//! ```text
//! cs-01-jurisdiction-policy/
//! ├── domain/          # JurisdictionConfig, BannerCopy, PrivacySignals
//! ├── algorithms/      # detect_jurisdiction, the static table
//! └── application/     # PolicySelector (once per session)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod domain;

// Re-exports
pub use algorithms::{
    all_configs, detect_jurisdiction, get_jurisdiction_config, jurisdiction_for_region,
};
pub use application::PolicySelector;
pub use domain::{BannerCopy, JurisdictionConfig, PrivacySignals};
pub use shared_types::Jurisdiction;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
