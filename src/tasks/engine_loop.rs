//! Engine event loop background task

use tracing::{debug, info};

use super::messages::{Command, EngineMessage, EngineReceiver};
use crate::timer::TimerEngine;

/// Background task that owns the engine and applies queued messages in order
pub async fn engine_task(mut engine: TimerEngine, mut rx: EngineReceiver) {
    info!("Starting timer engine task ({} tick source)", engine.tick_source_kind());

    while let Some(message) = rx.recv().await {
        handle_message(&mut engine, message);
    }

    info!("Engine queue closed, stopping timer engine task");
}

/// Apply one message to the engine
pub fn handle_message(engine: &mut TimerEngine, message: EngineMessage) {
    match message {
        EngineMessage::WakeUp => engine.on_wake_up(),
        EngineMessage::VisibilityResumed => engine.on_visibility_resumed(),
        EngineMessage::Command { command, reply } => {
            debug!("Engine received command: {}", command.name());
            apply_command(engine, command);
            if reply.send(engine.report()).is_err() {
                debug!("Command caller went away before the reply");
            }
        }
        EngineMessage::History(reply) => {
            if reply.send(engine.ledger().history().to_vec()).is_err() {
                debug!("History caller went away before the reply");
            }
        }
    }
}

fn apply_command(engine: &mut TimerEngine, command: Command) {
    match command {
        Command::Start => engine.start(),
        Command::Pause => engine.pause(),
        Command::Toggle => engine.toggle(),
        Command::Reset => engine.reset(),
        Command::SetDuration { minutes, seconds } => engine.set_duration(minutes, seconds),
        Command::SetSoundEnabled(enabled) => engine.set_sound_enabled(enabled),
        Command::Report => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};
    use tokio::{runtime::Handle, sync::oneshot, time::timeout};

    use crate::{
        state::{SelectedTask, TimerPhase},
        storage::MemoryStore,
        tasks::{messages::engine_channel, tick_source::IntervalTickSource},
        timer::{EngineParts, SystemClock},
    };

    #[tokio::test]
    async fn one_second_countdown_completes_through_the_queue() {
        let (engine_tx, engine_rx) = engine_channel();
        let mut engine = TimerEngine::initialize(EngineParts {
            clock: Arc::new(SystemClock),
            store: Box::new(MemoryStore::new()),
            ticker: Box::new(IntervalTickSource::new(
                engine_tx.clone(),
                Handle::current(),
                Duration::from_millis(50),
            )),
            tasks: Arc::new(SelectedTask::new()),
        });
        engine.set_duration(0, 1);
        engine.start();

        let mut completions = engine.subscribe_completions();
        let display = engine.subscribe_display();
        tokio::spawn(engine_task(engine, engine_rx));

        let event = timeout(Duration::from_secs(3), completions.recv())
            .await
            .expect("countdown did not complete")
            .unwrap();
        assert_eq!(event.record.duration_seconds, 1);

        let (reply, report) = oneshot::channel();
        engine_tx
            .send(EngineMessage::Command {
                command: Command::Report,
                reply,
            })
            .unwrap();
        let report = report.await.unwrap();
        assert_eq!(report.phase, TimerPhase::Idle);
        assert_eq!(report.completed_count, 1);
        assert_eq!(report.deadline, None);
        assert_eq!(display.borrow().formatted(), "00:01");
        assert!(!display.borrow().running);

        let (reply, history) = oneshot::channel();
        engine_tx.send(EngineMessage::History(reply)).unwrap();
        assert_eq!(history.await.unwrap().len(), 1);
    }
}
