//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, a directory of files natively)

pub mod storage;

pub use storage::{KeyValueStore, MemoryStorage, default_storage};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
