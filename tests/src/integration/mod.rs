//! # Integration Tests
//!
//! Flows that cross subsystem boundaries: controller, cache, sync client,
//! event bus and the remote store.

pub mod fake_store;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod properties;
#[cfg(test)]
mod scenarios;
