//! # Domain Module
//!
//! Core domain types for the Jurisdiction Policy Table.

pub mod policy;
pub mod signals;

pub use policy::*;
pub use signals::*;
