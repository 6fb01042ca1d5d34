//! Process-level helpers
//!
//! Shutdown signal handling for the daemon's main loop.

pub mod signals;

pub use signals::shutdown_signal;
