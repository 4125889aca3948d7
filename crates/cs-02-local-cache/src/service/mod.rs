//! # Service
//!
//! The consent cache built on the storage port.

pub mod cache;

pub use cache::*;
