//! Persistence adapter abstraction
//!
//! The engine only ever loads once at startup and saves the whole snapshot
//! after each transition. Failures are logged by the implementation and
//! reported as `None`/`false`; they never reach the engine as errors.

use tracing::debug;

use super::snapshot::PersistedSnapshot;

/// Durable single-key store for the engine snapshot
pub trait SnapshotStore: Send {
    /// Read the stored snapshot; missing or unreadable data is `None`
    fn load(&self) -> Option<PersistedSnapshot>;

    /// Overwrite the stored snapshot, returning whether it was written
    fn save(&mut self, snapshot: &PersistedSnapshot) -> bool;
}

/// Snapshot store that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshot: Option<PersistedSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a snapshot already stored
    pub fn with_snapshot(snapshot: PersistedSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<PersistedSnapshot> {
        self.snapshot.clone()
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) -> bool {
        debug!("Storing snapshot in memory");
        self.snapshot = Some(snapshot.clone());
        true
    }
}
