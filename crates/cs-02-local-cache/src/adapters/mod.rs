//! # Adapters
//!
//! Storage backends for the Local Cache Store.

#[cfg(feature = "file-storage")]
pub mod file;
pub mod memory;

#[cfg(feature = "file-storage")]
pub use file::FileStorage;
pub use memory::{InMemoryStorage, TabStorage, UnavailableStorage};
