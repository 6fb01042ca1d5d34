//! Currently selected task, shared with the todo collaborator

use std::sync::{Arc, Mutex};
use tracing::warn;

use super::ledger::TaskId;

/// Read access to the task a finished cycle should be credited to
pub trait TaskAssociation: Send + Sync {
    fn current_task(&self) -> Option<TaskId>;
}

/// Shared cell holding the selected task
#[derive(Debug, Clone, Default)]
pub struct SelectedTask {
    inner: Arc<Mutex<Option<TaskId>>>,
}

impl SelectedTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, task: Option<TaskId>) -> Result<(), String> {
        let mut selected = self.inner.lock()
            .map_err(|e| format!("Failed to lock selected task: {}", e))?;
        *selected = task;
        Ok(())
    }
}

impl TaskAssociation for SelectedTask {
    fn current_task(&self) -> Option<TaskId> {
        match self.inner.lock() {
            Ok(selected) => *selected,
            Err(e) => {
                warn!("Failed to read selected task: {}", e);
                None
            }
        }
    }
}
