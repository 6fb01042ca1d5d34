//! Countdown configuration and live countdown state

use serde::{Deserialize, Serialize};

use crate::timer::{
    clock::EpochMillis,
    deadline::{clamp_duration, format_display_time, to_seconds},
};

pub const DEFAULT_MINUTES: u32 = 25;
pub const DEFAULT_SECONDS: u32 = 0;

/// Duration every new cycle starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    initial_minutes: u32,
    initial_seconds: u32,
}

impl CountdownConfig {
    /// Build a config from raw input, clamping both fields
    ///
    /// A 0:00 duration is raised to 0:01 so a cycle always spans at least one tick.
    pub fn new(minutes: i64, seconds: i64) -> Self {
        let (initial_minutes, mut initial_seconds) = clamp_duration(minutes, seconds);
        if initial_minutes == 0 && initial_seconds == 0 {
            initial_seconds = 1;
        }
        Self {
            initial_minutes,
            initial_seconds,
        }
    }

    pub fn initial_minutes(&self) -> u32 {
        self.initial_minutes
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        to_seconds(self.initial_minutes, self.initial_seconds)
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            initial_minutes: DEFAULT_MINUTES,
            initial_seconds: DEFAULT_SECONDS,
        }
    }
}

/// Live countdown owned by the engine
///
/// `deadline` is the source of truth while running; the remaining pair is a
/// cached projection of `deadline - now`. Running is defined as having a
/// deadline, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_minutes: u32,
    pub remaining_seconds: u32,
    pub deadline: Option<EpochMillis>,
}

impl CountdownState {
    /// Idle countdown sitting at the start of a cycle
    pub fn idle(config: &CountdownConfig) -> Self {
        Self {
            remaining_minutes: config.initial_minutes(),
            remaining_seconds: config.initial_seconds(),
            deadline: None,
        }
    }

    pub fn running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_zero(&self) -> bool {
        self.remaining_minutes == 0 && self.remaining_seconds == 0
    }

    pub fn display(&self) -> DisplayTime {
        DisplayTime {
            minutes: self.remaining_minutes,
            seconds: self.remaining_seconds,
            running: self.running(),
        }
    }
}

/// Coarse state of the engine's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
}

/// Read-only projection handed to display collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTime {
    pub minutes: u32,
    pub seconds: u32,
    pub running: bool,
}

impl DisplayTime {
    pub fn formatted(&self) -> String {
        format_display_time(self.minutes, self.seconds)
    }
}
