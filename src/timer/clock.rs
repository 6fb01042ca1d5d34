//! Wall-clock time source

use chrono::Utc;

/// Milliseconds since the Unix epoch
pub type EpochMillis = i64;

/// Source of the current wall-clock instant
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> EpochMillis;
}

/// Clock backed by the system's real-time clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMillis {
        Utc::now().timestamp_millis()
    }
}
