//! # Shared Types Crate
//!
//! This crate contains the consent domain entities shared by every
//! Consent-Sync subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Necessary Is Not Optional**: `ConsentPreferences` has no field for the
//!   necessary category; it is always granted and always serialized as `true`.
//! - **Replace, Never Patch**: a `ConsentRecord` is replaced wholesale when the
//!   user decides again.

pub mod entities;
pub mod errors;
pub mod jurisdiction;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use jurisdiction::Jurisdiction;
pub use time::{Clock, ManualClock, SystemClock};
