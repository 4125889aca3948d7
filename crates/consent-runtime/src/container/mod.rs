//! # Container
//!
//! Configuration for the composed runtime.

pub mod config;

pub use config::{parse_jurisdiction, ConfigError, RuntimeConfig};
