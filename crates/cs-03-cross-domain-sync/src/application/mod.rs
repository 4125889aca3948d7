//! # Application Layer
//!
//! The sync client and its periodic driver.

mod client;
mod periodic;

pub use client::CrossDomainSyncClient;
pub use periodic::{PeriodicSync, SyncHandle};
