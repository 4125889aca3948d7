//! # Consent-Sync Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Hot-path benchmarks per subsystem
//! │   ├── cs_01_policy.rs
//! │   └── cs_02_cache.rs
//! │
//! └── integration/      # Cross-subsystem flows
//!     ├── fake_store.rs # axum remote consent store
//!     ├── properties.rs # Consent invariants
//!     ├── scenarios.rs  # User-visible flows
//!     └── http_sync.rs  # Sync client over real HTTP
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cs-tests
//!
//! # By category
//! cargo test -p cs-tests integration::properties::
//! cargo test -p cs-tests integration::http_sync::
//!
//! # Benchmarks
//! cargo bench -p cs-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod benchmarks;
pub mod integration;
