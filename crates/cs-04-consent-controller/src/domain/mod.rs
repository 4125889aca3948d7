//! # Domain Module
//!
//! Decision state, snapshots and errors for the Consent State Controller.

pub mod errors;
pub mod state;

pub use errors::*;
pub use state::*;
