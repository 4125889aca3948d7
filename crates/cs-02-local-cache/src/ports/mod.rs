//! # Ports
//!
//! Outbound storage port for the Local Cache Store.

pub mod outbound;

pub use outbound::*;
