//! Focus ledger: completed cycles and accumulated focus time

use serde::{Deserialize, Serialize};

use crate::timer::clock::EpochMillis;

/// Identifier of a task owned by the todo collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

/// One finished countdown cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub timestamp: EpochMillis,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    #[serde(rename = "taskId", default)]
    pub task_ref: Option<TaskId>,
}

/// Append-only history of completed cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusLedger {
    completed_count: u64,
    total_focus_seconds: u64,
    history: Vec<CompletionRecord>,
}

impl FocusLedger {
    /// Rebuild a ledger from persisted values
    pub fn restore(completed_count: u64, total_focus_seconds: u64, history: Vec<CompletionRecord>) -> Self {
        Self {
            completed_count,
            total_focus_seconds,
            history,
        }
    }

    pub fn completed_count(&self) -> u64 {
        self.completed_count
    }

    pub fn total_focus_seconds(&self) -> u64 {
        self.total_focus_seconds
    }

    pub fn history(&self) -> &[CompletionRecord] {
        &self.history
    }

    /// Credit seconds observed between two samples
    pub fn add_focus_seconds(&mut self, seconds: u64) {
        self.total_focus_seconds = self.total_focus_seconds.saturating_add(seconds);
    }

    /// Append a finished cycle
    pub fn record_completion(&mut self, record: CompletionRecord) {
        self.completed_count = self.completed_count.saturating_add(1);
        self.history.push(record);
    }
}
