//! Local draft persistence.
//!
//! This crate provides:
//! - A key/value store abstraction with in-memory and file-backed implementations
//! - The saved-progress repository used for session resumption

pub mod error;
pub mod repository;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use repository::{ProgressRepository, DEFAULT_PROGRESS_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
