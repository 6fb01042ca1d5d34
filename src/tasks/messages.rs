//! Messages carried by the engine's single event queue
//!
//! Wake-ups, resume signals and user actions all travel through one
//! unbounded channel, so the engine handles them strictly in arrival order.

use tokio::sync::{mpsc, oneshot};

use crate::{state::CompletionRecord, timer::EngineReport};

/// A user action applied to the timer engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    SetDuration { minutes: i64, seconds: i64 },
    SetSoundEnabled(bool),
    /// Read the current state without changing it
    Report,
}

impl Command {
    /// Short action name used for logging and last-action tracking
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Toggle => "toggle",
            Command::Reset => "reset",
            Command::SetDuration { .. } => "set-duration",
            Command::SetSoundEnabled(_) => "set-sound",
            Command::Report => "report",
        }
    }
}

#[derive(Debug)]
pub enum EngineMessage {
    /// Periodic signal from the tick source
    WakeUp,
    /// The host came back from sleep or a UI became visible again
    VisibilityResumed,
    Command {
        command: Command,
        reply: oneshot::Sender<EngineReport>,
    },
    History(oneshot::Sender<Vec<CompletionRecord>>),
}

pub type EngineSender = mpsc::UnboundedSender<EngineMessage>;
pub type EngineReceiver = mpsc::UnboundedReceiver<EngineMessage>;

/// Create the engine queue
pub fn engine_channel() -> (EngineSender, EngineReceiver) {
    mpsc::unbounded_channel()
}
