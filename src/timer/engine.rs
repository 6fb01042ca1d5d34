//! Countdown state machine
//!
//! The engine counts down towards an absolute deadline. Wake-ups only prompt
//! it to look at the clock again, so a wake-up that arrives late, twice, or
//! not at all never changes what the countdown shows.
//!
//! ```text
//! Idle --start--> Running --deadline reached--> Complete --> Idle
//!   ^               |
//!   +--pause/reset--+
//! ```
//!
//! Every transition ends by writing the full snapshot to the store.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    clock::{Clock, EpochMillis},
    deadline::{compute_deadline, elapsed_since, remaining, remaining_as_minutes_seconds, to_seconds},
};
use crate::{
    state::{
        CompletionRecord, CountdownConfig, CountdownState, DisplayTime, FocusLedger, TaskAssociation,
        TimerPhase,
    },
    storage::{PersistedSnapshot, ResumePlan, SnapshotStore},
    tasks::tick_source::TickSource,
};

/// Emitted once per finished cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionEvent {
    pub record: CompletionRecord,
    pub sound_enabled: bool,
}

/// Read-only summary of the engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineReport {
    pub phase: TimerPhase,
    pub display: DisplayTime,
    pub deadline: Option<EpochMillis>,
    pub initial_minutes: u32,
    pub initial_seconds: u32,
    pub completed_count: u64,
    pub total_focus_seconds: u64,
    pub sound_enabled: bool,
}

/// Collaborators the engine is built from
pub struct EngineParts {
    pub clock: Arc<dyn Clock>,
    pub store: Box<dyn SnapshotStore>,
    pub ticker: Box<dyn TickSource>,
    pub tasks: Arc<dyn TaskAssociation>,
}

pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    store: Box<dyn SnapshotStore>,
    ticker: Box<dyn TickSource>,
    tasks: Arc<dyn TaskAssociation>,
    config: CountdownConfig,
    countdown: CountdownState,
    ledger: FocusLedger,
    sound_enabled: bool,
    display_tx: watch::Sender<DisplayTime>,
    completion_tx: broadcast::Sender<CompletionEvent>,
}

impl TimerEngine {
    /// Build the engine from the stored snapshot, resuming a live countdown
    ///
    /// A countdown whose deadline passed while the process was gone completes
    /// here, once.
    pub fn initialize(parts: EngineParts) -> Self {
        let now = parts.clock.now_ms();
        let restored = match parts.store.load() {
            Some(snapshot) => {
                info!("Restoring timer state from saved snapshot");
                snapshot.normalize(now)
            }
            None => {
                info!("No saved timer state, starting from defaults");
                PersistedSnapshot::default().normalize(now)
            }
        };

        let (display_tx, _) = watch::channel(restored.countdown.display());
        let (completion_tx, _) = broadcast::channel(16);

        let mut engine = Self {
            clock: parts.clock,
            store: parts.store,
            ticker: parts.ticker,
            tasks: parts.tasks,
            config: restored.config,
            countdown: restored.countdown,
            ledger: restored.ledger,
            sound_enabled: restored.sound_enabled,
            display_tx,
            completion_tx,
        };

        match restored.resume {
            ResumePlan::Idle => {
                debug!("Restored idle countdown at {}", engine.display().formatted());
                engine.publish();
                engine.persist();
            }
            ResumePlan::Live { deadline } => {
                engine.countdown.deadline = Some(deadline);
                engine.ticker.arm();
                engine.sample(now);
                info!("Resumed running countdown at {}", engine.display().formatted());
                engine.publish();
                engine.persist();
            }
            ResumePlan::Expired { deadline } => {
                info!("Countdown expired while the process was stopped, completing it now");
                engine.countdown.deadline = Some(deadline);
                engine.sample(now);
                engine.complete(deadline);
            }
        }

        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        if self.countdown.running() {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    pub fn display(&self) -> DisplayTime {
        self.countdown.display()
    }

    pub fn config(&self) -> CountdownConfig {
        self.config
    }

    pub fn ledger(&self) -> &FocusLedger {
        &self.ledger
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn tick_source_kind(&self) -> &'static str {
        self.ticker.kind()
    }

    pub fn report(&self) -> EngineReport {
        EngineReport {
            phase: self.phase(),
            display: self.display(),
            deadline: self.countdown.deadline,
            initial_minutes: self.config.initial_minutes(),
            initial_seconds: self.config.initial_seconds(),
            completed_count: self.ledger.completed_count(),
            total_focus_seconds: self.ledger.total_focus_seconds(),
            sound_enabled: self.sound_enabled,
        }
    }

    /// Receive the display projection whenever it changes
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayTime> {
        self.display_tx.subscribe()
    }

    /// Receive one event per completed cycle
    pub fn subscribe_completions(&self) -> broadcast::Receiver<CompletionEvent> {
        self.completion_tx.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) {
        if self.countdown.running() {
            debug!("Start ignored, countdown already running");
            return;
        }
        if self.countdown.is_zero() {
            self.countdown = CountdownState::idle(&self.config);
        }

        let now = self.clock.now_ms();
        let deadline = compute_deadline(self.countdown.remaining_minutes, self.countdown.remaining_seconds, now);
        self.countdown.deadline = Some(deadline);
        self.ticker.arm();
        info!("Countdown started at {}", self.display().formatted());

        self.publish();
        self.persist();
    }

    pub fn pause(&mut self) {
        if !self.countdown.running() {
            debug!("Pause ignored, countdown not running");
            return;
        }

        let now = self.clock.now_ms();
        if self.sample(now) == Some(0) {
            self.complete(now);
            return;
        }

        self.ticker.disarm();
        self.countdown.deadline = None;
        info!("Countdown paused at {}", self.display().formatted());

        self.publish();
        self.persist();
    }

    pub fn toggle(&mut self) {
        if self.countdown.running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop any running countdown and return to the configured duration
    pub fn reset(&mut self) {
        self.ticker.disarm();
        self.countdown = CountdownState::idle(&self.config);
        info!("Countdown reset to {}", self.display().formatted());

        self.publish();
        self.persist();
    }

    /// Change the duration future cycles start from
    ///
    /// A running countdown keeps its deadline; an idle one shows the new
    /// duration immediately.
    pub fn set_duration(&mut self, minutes: i64, seconds: i64) {
        self.config = CountdownConfig::new(minutes, seconds);
        if !self.countdown.running() {
            self.countdown = CountdownState::idle(&self.config);
        }
        info!(
            "Duration set to {}:{:02}",
            self.config.initial_minutes(),
            self.config.initial_seconds()
        );

        self.publish();
        self.persist();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        info!("Completion sound {}", if enabled { "enabled" } else { "disabled" });
        self.persist();
    }

    /// Recompute the countdown from its deadline
    pub fn on_wake_up(&mut self) {
        let now = self.clock.now_ms();
        match self.sample(now) {
            None => debug!("Wake-up while idle, nothing to do"),
            Some(0) => self.complete(now),
            Some(_) => {
                self.publish();
                self.persist();
            }
        }
    }

    /// Catch up immediately after the host was asleep or hidden
    pub fn on_visibility_resumed(&mut self) {
        debug!("Visibility resumed, checking countdown");
        self.on_wake_up();
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Refresh the displayed time from the deadline and credit focus time
    ///
    /// Returns the remaining milliseconds, or `None` when not running.
    fn sample(&mut self, now: EpochMillis) -> Option<u64> {
        let deadline = self.countdown.deadline?;
        let remaining_ms = remaining(deadline, now);
        let (minutes, seconds) = remaining_as_minutes_seconds(remaining_ms);

        let elapsed = elapsed_since(
            self.countdown.remaining_minutes,
            self.countdown.remaining_seconds,
            minutes,
            seconds,
        );
        self.ledger.add_focus_seconds(elapsed);
        self.countdown.remaining_minutes = minutes;
        self.countdown.remaining_seconds = seconds;

        Some(remaining_ms)
    }

    /// Finish the current cycle; fires at most once per armed period
    fn complete(&mut self, timestamp: EpochMillis) {
        if self.countdown.deadline.take().is_none() {
            debug!("Completion already handled");
            return;
        }
        self.ticker.disarm();

        let record = CompletionRecord {
            timestamp,
            duration_seconds: to_seconds(self.config.initial_minutes(), self.config.initial_seconds()),
            task_ref: self.tasks.current_task(),
        };
        info!(
            "Countdown complete ({}s, task {:?})",
            record.duration_seconds, record.task_ref
        );
        self.ledger.record_completion(record.clone());

        let event = CompletionEvent {
            record,
            sound_enabled: self.sound_enabled,
        };
        if self.completion_tx.send(event).is_err() {
            debug!("No completion listeners");
        }

        self.reset();
    }

    fn publish(&self) {
        self.display_tx.send_replace(self.countdown.display());
    }

    fn persist(&mut self) {
        let snapshot = PersistedSnapshot::capture(&self.config, &self.countdown, &self.ledger, self.sound_enabled);
        if !self.store.save(&snapshot) {
            warn!("Snapshot not persisted, continuing with in-memory state");
        }
    }
}
