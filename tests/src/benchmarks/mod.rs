//! # Consent-Sync Benchmarks
//!
//! Hot paths that run on every page view: jurisdiction selection and the
//! local cache read.

pub mod cs_01_policy;
pub mod cs_02_cache;
