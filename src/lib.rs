//! Focus Timer - a drift-free countdown engine behind a small HTTP daemon
//!
//! The countdown is computed from an absolute deadline, woken by an isolated
//! tick source, and persisted after every transition so a running countdown
//! survives sleep, restarts and crashes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use timer::{EngineParts, TimerEngine};
pub use utils::signals::shutdown_signal;
