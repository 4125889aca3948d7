//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the remote store port.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpRemoteConsentStore;
