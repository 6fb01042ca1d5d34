//! Error types for the fallible plumbing around the timer engine
//!
//! The engine's own transitions never fail. These errors only show up at the
//! edges: the snapshot file, and the queue between the HTTP layer and the
//! engine loop.

use thiserror::Error;

/// Errors produced by storage and engine-loop plumbing
#[derive(Debug, Error)]
pub enum TimerError {
    /// Reading or writing the snapshot file failed
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The engine loop has shut down and no longer accepts messages
    #[error("Timer engine is not running")]
    EngineStopped,
}

pub type Result<T> = std::result::Result<T, TimerError>;
