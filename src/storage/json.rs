//! JSON file snapshot store
//!
//! The whole snapshot is one JSON document. Writes go to a temporary file
//! that is flushed to disk and then renamed over the target, so a crash or
//! power loss mid-write leaves the previous snapshot intact.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, error, warn};

use super::{backend::SnapshotStore, snapshot::PersistedSnapshot};
use crate::error::Result;

/// Snapshot store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_snapshot(&self) -> Result<Option<PersistedSnapshot>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.file_path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn write_snapshot(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp_path = self.file_path.with_extension("tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Option<PersistedSnapshot> {
        match self.read_snapshot() {
            Ok(Some(snapshot)) => {
                debug!("Loaded snapshot from {}", self.file_path.display());
                Some(snapshot)
            }
            Ok(None) => {
                debug!("No snapshot at {}", self.file_path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable snapshot {}: {}", self.file_path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) -> bool {
        match self.write_snapshot(snapshot) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save snapshot to {}: {}", self.file_path.display(), e);
                false
            }
        }
    }
}
