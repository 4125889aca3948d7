//! # Domain Module
//!
//! Wire types, errors and outcome values for the Cross-Domain Sync Client.

pub mod errors;
pub mod outcomes;
pub mod wire;

pub use errors::*;
pub use outcomes::*;
pub use wire::*;
