//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{CompletionRecord, DisplayTime, TaskId, TimerPhase},
    timer::EngineReport,
};

/// Response structure for endpoints that change the timer
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: TimerPhase,
    pub message: String,
    pub display: String,
    pub timestamp: DateTime<Utc>,
    pub timer: EngineReport,
}

impl ApiResponse {
    pub fn new(message: String, timer: EngineReport) -> Self {
        Self {
            status: timer.phase,
            message,
            display: timer.display.formatted(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: EngineReport,
    pub display: String,
    pub total_focus: String,
    pub selected_task: Option<TaskId>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Display projection response
#[derive(Debug, Clone, Serialize)]
pub struct DisplayResponse {
    pub minutes: u32,
    pub seconds: u32,
    pub running: bool,
    pub formatted: String,
}

impl From<DisplayTime> for DisplayResponse {
    fn from(display: DisplayTime) -> Self {
        Self {
            minutes: display.minutes,
            seconds: display.seconds,
            running: display.running,
            formatted: display.formatted(),
        }
    }
}

/// Completion history response
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub records: Vec<CompletionRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of `PUT /duration`: either `{minutes, seconds}` or `{time: "MM:SS"}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationRequest {
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
    pub time: Option<String>,
}

/// Body of `PUT /sound`
#[derive(Debug, Clone, Deserialize)]
pub struct SoundRequest {
    pub enabled: bool,
}

/// Body of `PUT /task`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub task_id: Option<TaskId>,
}
