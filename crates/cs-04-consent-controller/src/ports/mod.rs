//! # Ports
//!
//! Inbound API of the Consent State Controller. Its outbound dependencies
//! are the cache (cs-02) and the sync client port (cs-03).

pub mod inbound;

pub use inbound::*;
