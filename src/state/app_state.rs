//! Application state shared with HTTP handlers

use std::{
    sync::Mutex,
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, watch};
use tracing::{info, warn};

use super::{CompletionRecord, DisplayTime, SelectedTask, TaskId};
use crate::{
    error::{Result, TimerError},
    tasks::{Command, EngineMessage, EngineSender},
    timer::EngineReport,
};

/// Handle to the running engine plus server metadata
///
/// Handlers never touch the engine directly; every action is queued behind
/// tick wake-ups on the engine's single event queue.
#[derive(Debug)]
pub struct AppState {
    /// Queue into the engine task
    pub engine_tx: EngineSender,
    /// Latest display projection published by the engine
    pub display_rx: watch::Receiver<DisplayTime>,
    /// Task that the next completed cycle is credited to
    pub selected_task: SelectedTask,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        engine_tx: EngineSender,
        display_rx: watch::Receiver<DisplayTime>,
        selected_task: SelectedTask,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            engine_tx,
            display_rx,
            selected_task,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Queue a command and wait for the engine's report after applying it
    pub async fn send_command(&self, command: Command) -> Result<EngineReport> {
        let (reply, response) = oneshot::channel();
        self.engine_tx
            .send(EngineMessage::Command { command, reply })
            .map_err(|_| TimerError::EngineStopped)?;
        let report = response.await.map_err(|_| TimerError::EngineStopped)?;

        if command != Command::Report {
            self.record_action(command.name());
        }
        Ok(report)
    }

    /// Tell the engine the UI became visible again
    pub fn signal_visible(&self) -> Result<()> {
        self.engine_tx
            .send(EngineMessage::VisibilityResumed)
            .map_err(|_| TimerError::EngineStopped)?;
        self.record_action("visible");
        Ok(())
    }

    /// Fetch the completion history
    pub async fn history(&self) -> Result<Vec<CompletionRecord>> {
        let (reply, response) = oneshot::channel();
        self.engine_tx
            .send(EngineMessage::History(reply))
            .map_err(|_| TimerError::EngineStopped)?;
        response.await.map_err(|_| TimerError::EngineStopped)
    }

    /// Choose the task future completions are credited to
    pub fn select_task(&self, task: Option<TaskId>) -> std::result::Result<(), String> {
        info!("Selecting task: {:?}", task);
        self.selected_task.select(task)?;
        self.record_action("select-task");
        Ok(())
    }

    /// Current display projection without a round-trip to the engine
    pub fn display(&self) -> DisplayTime {
        *self.display_rx.borrow()
    }

    fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => warn!("Failed to record last action: {}", e),
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
