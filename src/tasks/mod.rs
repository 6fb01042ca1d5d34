//! Background tasks module
//!
//! This module contains the engine event loop, the tick sources that wake
//! it, and the task that notices when the host comes back from sleep.

pub mod engine_loop;
pub mod messages;
pub mod tick_source;
pub mod wake_up_recovery;

// Re-export main functions
pub use engine_loop::engine_task;
pub use messages::{engine_channel, Command, EngineMessage, EngineReceiver, EngineSender};
pub use tick_source::{build_tick_source, IntervalTickSource, IsolatedTickSource, TickSource};
pub use wake_up_recovery::wake_up_recovery_task;
