//! # Domain Module
//!
//! Core domain types for the Local Cache Store.

pub mod change;
pub mod errors;

pub use change::*;
pub use errors::*;
