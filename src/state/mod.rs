//! State management module
//!
//! Countdown and ledger data owned by the timer engine, the shared task
//! selection, and the application state handed to HTTP handlers.

pub mod app_state;
pub mod countdown;
pub mod ledger;
pub mod selection;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{CountdownConfig, CountdownState, DisplayTime, TimerPhase};
pub use ledger::{CompletionRecord, FocusLedger, TaskId};
pub use selection::{SelectedTask, TaskAssociation};
