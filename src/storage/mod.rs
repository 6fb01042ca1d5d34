//! Snapshot persistence
//!
//! The snapshot shape, its normalization, and the stores that hold it.

pub mod backend;
pub mod json;
pub mod snapshot;

pub use backend::{MemoryStore, SnapshotStore};
pub use json::JsonFileStore;
pub use snapshot::{NormalizedSnapshot, PersistedSnapshot, ResumePlan};
