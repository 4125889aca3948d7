//! # Ports (Hexagonal Architecture)
//!
//! - `inbound`: what the sync client offers
//! - `outbound`: the remote store it depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
