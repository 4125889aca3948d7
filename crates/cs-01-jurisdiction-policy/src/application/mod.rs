//! # Application Module
//!
//! Per-session policy selection.

pub mod selector;

pub use selector::PolicySelector;
