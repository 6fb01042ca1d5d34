//! Timer core
//!
//! Clock abstraction, deadline arithmetic and the countdown state machine.

pub mod clock;
pub mod deadline;
pub mod engine;

pub use clock::{Clock, EpochMillis, SystemClock};
pub use engine::{CompletionEvent, EngineParts, EngineReport, TimerEngine};
