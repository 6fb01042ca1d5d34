//! Collaborator services module
//!
//! Side effects the engine triggers but never waits for.

pub mod notifier;

// Re-export main functions
pub use notifier::{completion_notifier_task, play_completion_sound};
