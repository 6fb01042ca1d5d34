//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, TaskAssociation},
    tasks::Command,
    timer::deadline::{format_total_time, parse_time_string},
};
use super::responses::{
    ApiResponse, DisplayResponse, DurationRequest, HealthResponse, HistoryResponse, SoundRequest, StatusResponse, TaskRequest,
};

fn engine_unavailable(action: &str, e: TimerError) -> StatusCode {
    error!("Failed to {}: {}", action, e);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn run_command(
    state: &AppState,
    command: Command,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    let report = state
        .send_command(command)
        .await
        .map_err(|e| engine_unavailable(command.name(), e))?;
    info!("{} endpoint called - timer now {}", command.name(), report.display.formatted());
    Ok(Json(ApiResponse::new(message.to_string(), report)))
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Start, "Countdown started").await
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Pause, "Countdown paused").await
}

/// Handle POST /toggle - Start if idle, pause if running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Toggle, "Countdown toggled").await
}

/// Handle POST /reset - Return to the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Reset, "Countdown reset").await
}

/// Handle PUT /duration - Edit the configured duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let (minutes, seconds) = match &request.time {
        Some(time) => match parse_time_string(time) {
            Some((minutes, seconds)) => (i64::from(minutes), i64::from(seconds)),
            None => {
                warn!("Rejected duration input: {:?}", time);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => (request.minutes.unwrap_or(0), request.seconds.unwrap_or(0)),
    };

    run_command(&state, Command::SetDuration { minutes, seconds }, "Duration updated").await
}

/// Handle PUT /sound - Enable or disable the completion sound
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SoundRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let message = if request.enabled { "Sound enabled" } else { "Sound disabled" };
    run_command(&state, Command::SetSoundEnabled(request.enabled), message).await
}

/// Handle PUT /task - Select the task completions are credited to
pub async fn task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = state.select_task(request.task_id) {
        error!("Failed to select task: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    run_command(&state, Command::Report, "Task selected").await
}

/// Handle POST /visible - A client regained visibility, refresh immediately
pub async fn visible_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state
        .signal_visible()
        .map_err(|e| engine_unavailable("signal visibility", e))?;
    run_command(&state, Command::Report, "Countdown refreshed").await
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state
        .send_command(Command::Report)
        .await
        .map_err(|e| engine_unavailable("read timer state", e))?;

    let selected_task = state.selected_task.current_task();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        display: timer.display.formatted(),
        total_focus: format_total_time(timer.total_focus_seconds),
        timer,
        selected_task,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /display - Latest display projection, answered without the engine queue
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Json<DisplayResponse> {
    Json(DisplayResponse::from(state.display()))
}

/// Handle GET /history - Return all completed cycles
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Result<Json<HistoryResponse>, StatusCode> {
    let records = state
        .history()
        .await
        .map_err(|e| engine_unavailable("read history", e))?;

    Ok(Json(HistoryResponse {
        count: records.len(),
        records,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
