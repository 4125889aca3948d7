//! # Algorithms Module
//!
//! Detection heuristics and the static policy table.

pub mod detection;
pub mod table;

pub use detection::{detect_jurisdiction, jurisdiction_for_region};
pub use table::{all_configs, get_jurisdiction_config};
