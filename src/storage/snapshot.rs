//! Persisted snapshot shape and its normalization
//!
//! The snapshot is written whole on every transition. On read every key is
//! optional and read leniently: a key with the wrong type falls back to its
//! default on its own, so one bad value never discards the history.
//! [`PersistedSnapshot::normalize`] is the single place where missing or
//! out-of-range values are replaced by defaults, so the engine only ever
//! sees fully populated state.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    state::{CompletionRecord, CountdownConfig, CountdownState, FocusLedger},
    timer::{
        clock::EpochMillis,
        deadline::{clamp_duration, remaining, to_seconds, MAX_MINUTES, MAX_SECONDS},
    },
};

/// On-disk representation of config, countdown and ledger
///
/// ```json
/// {
///   "completedPomodoros": 3,
///   "totalFocusTime": 4500,
///   "history": [{ "timestamp": 1700000000000, "duration": 1500, "taskId": 17 }],
///   "soundEnabled": true,
///   "initialMinutes": 25,
///   "initialSeconds": 0,
///   "currentMinutes": 12,
///   "currentSeconds": 41,
///   "wasRunning": true,
///   "endTime": 1700000761000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    #[serde(default, deserialize_with = "lenient")]
    pub completed_pomodoros: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_focus_time: u64,
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<CompletionRecord>,
    #[serde(default = "sound_enabled_default", deserialize_with = "lenient_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub initial_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub initial_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub was_running: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<EpochMillis>,
}

fn sound_enabled_default() -> bool {
    true
}

/// Read a value, using the type's default when it has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Sound stays on unless explicitly disabled
fn lenient_sound_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(!matches!(Value::deserialize(deserializer)?, Value::Bool(false)))
}

/// Keep every well-formed record and skip the rest
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<CompletionRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(records)
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            completed_pomodoros: 0,
            total_focus_time: 0,
            history: Vec::new(),
            sound_enabled: sound_enabled_default(),
            initial_minutes: None,
            initial_seconds: None,
            current_minutes: None,
            current_seconds: None,
            was_running: false,
            end_time: None,
        }
    }
}

/// What the engine should do with a countdown found in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePlan {
    /// Sit idle at the restored remaining time
    Idle,
    /// Keep counting towards the stored deadline
    Live { deadline: EpochMillis },
    /// The deadline passed while the process was gone
    Expired { deadline: EpochMillis },
}

/// Fully populated state recovered from a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSnapshot {
    pub config: CountdownConfig,
    /// Last displayed remaining time, never running
    pub countdown: CountdownState,
    pub ledger: FocusLedger,
    pub sound_enabled: bool,
    pub resume: ResumePlan,
}

impl PersistedSnapshot {
    /// Capture the engine's current state for writing
    pub fn capture(
        config: &CountdownConfig,
        countdown: &CountdownState,
        ledger: &FocusLedger,
        sound_enabled: bool,
    ) -> Self {
        Self {
            completed_pomodoros: ledger.completed_count(),
            total_focus_time: ledger.total_focus_seconds(),
            history: ledger.history().to_vec(),
            sound_enabled,
            initial_minutes: Some(i64::from(config.initial_minutes())),
            initial_seconds: Some(i64::from(config.initial_seconds())),
            current_minutes: Some(i64::from(countdown.remaining_minutes)),
            current_seconds: Some(i64::from(countdown.remaining_seconds)),
            was_running: countdown.running(),
            end_time: countdown.deadline,
        }
    }

    /// Resolve defaults and decide how a stored countdown resumes at `now`
    pub fn normalize(self, now: EpochMillis) -> NormalizedSnapshot {
        let config = match (self.initial_minutes.unwrap_or(0), self.initial_seconds.unwrap_or(0)) {
            (0, 0) => CountdownConfig::default(),
            (minutes, seconds) => CountdownConfig::new(minutes, seconds),
        };

        let (current_minutes, current_seconds) = clamp_duration(
            self.current_minutes.unwrap_or(0),
            self.current_seconds.unwrap_or(0),
        );
        let countdown = if current_minutes == 0 && current_seconds == 0 {
            CountdownState::idle(&config)
        } else {
            CountdownState {
                remaining_minutes: current_minutes,
                remaining_seconds: current_seconds,
                deadline: None,
            }
        };

        // A deadline further out than the longest countdown cannot come from
        // a valid start; it means a corrupt file or a clock set backwards.
        let longest_ms = to_seconds(MAX_MINUTES, MAX_SECONDS) * 1000;
        let resume = match (self.was_running, self.end_time) {
            (true, Some(deadline)) if remaining(deadline, now) > longest_ms => {
                warn!("Ignoring stored deadline {} too far past {}", deadline, now);
                ResumePlan::Idle
            }
            (true, Some(deadline)) if remaining(deadline, now) > 0 => ResumePlan::Live { deadline },
            (true, Some(deadline)) => ResumePlan::Expired { deadline },
            _ => ResumePlan::Idle,
        };

        NormalizedSnapshot {
            config,
            countdown,
            ledger: FocusLedger::restore(self.completed_pomodoros, self.total_focus_time, self.history),
            sound_enabled: self.sound_enabled,
            resume,
        }
    }
}
