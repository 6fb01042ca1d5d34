//! Restart and resume behavior through the JSON file store

use std::{
    path::Path,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use focus_timer::{
    state::{SelectedTask, TaskId, TimerPhase},
    storage::{JsonFileStore, PersistedSnapshot, SnapshotStore},
    tasks::TickSource,
    timer::{Clock, EngineParts, EpochMillis, TimerEngine},
};

const START: EpochMillis = 1_700_000_000_000;

struct TestClock(AtomicI64);

impl TestClock {
    fn at(now: EpochMillis) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(now)))
    }

    fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> EpochMillis {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct QuietTicker {
    armed: bool,
}

impl TickSource for QuietTicker {
    fn arm(&mut self) {
        self.armed = true;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn kind(&self) -> &'static str {
        "quiet"
    }
}

fn boot(path: &Path, clock: Arc<TestClock>, tasks: SelectedTask) -> TimerEngine {
    TimerEngine::initialize(EngineParts {
        clock,
        store: Box::new(JsonFileStore::new(path)),
        ticker: Box::new(QuietTicker::default()),
        tasks: Arc::new(tasks),
    })
}

fn write_snapshot(path: &Path, json: serde_json::Value) {
    std::fs::write(path, serde_json::to_string(&json).unwrap()).unwrap();
}

fn read_snapshot(path: &Path) -> PersistedSnapshot {
    JsonFileStore::new(path).load().expect("snapshot on disk")
}

#[test]
fn live_countdown_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoroData.json");
    write_snapshot(
        &path,
        serde_json::json!({
            "completedPomodoros": 2,
            "totalFocusTime": 3000,
            "history": [],
            "soundEnabled": true,
            "initialMinutes": 25,
            "initialSeconds": 0,
            "currentMinutes": 0,
            "currentSeconds": 10,
            "wasRunning": true,
            "endTime": START + 10_000,
        }),
    );

    let engine = boot(&path, TestClock::at(START), SelectedTask::new());

    assert_eq!(engine.phase(), TimerPhase::Running);
    let display = engine.display();
    let remaining = u64::from(display.minutes) * 60 + u64::from(display.seconds);
    assert!(remaining > 0 && remaining <= 10, "remaining {remaining}");
    assert_eq!(engine.ledger().completed_count(), 2);
    assert_eq!(read_snapshot(&path).end_time, Some(START + 10_000));
}

#[test]
fn countdown_that_expired_while_stopped_completes_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoroData.json");
    write_snapshot(
        &path,
        serde_json::json!({
            "completedPomodoros": 7,
            "totalFocusTime": 9000,
            "history": [{ "timestamp": START - 3_600_000, "duration": 1500, "taskId": 1 }],
            "initialMinutes": 25,
            "initialSeconds": 0,
            "currentMinutes": 0,
            "currentSeconds": 4,
            "wasRunning": true,
            "endTime": START - 5_000,
        }),
    );

    let tasks = SelectedTask::new();
    tasks.select(Some(TaskId(99))).unwrap();
    let engine = boot(&path, TestClock::at(START), tasks);

    assert_eq!(engine.phase(), TimerPhase::Idle);
    assert_eq!(engine.ledger().completed_count(), 8);
    assert_eq!(engine.ledger().history().len(), 2);
    let record = &engine.ledger().history()[1];
    assert_eq!(record.duration_seconds, 1500);
    assert_eq!(record.task_ref, Some(TaskId(99)));

    let stored = read_snapshot(&path);
    assert_eq!(stored.completed_pomodoros, 8);
    assert!(!stored.was_running);
    assert_eq!(stored.end_time, None);
    assert_eq!((stored.current_minutes, stored.current_seconds), (Some(25), Some(0)));

    let again = boot(&path, TestClock::at(START + 1_000), SelectedTask::new());
    assert_eq!(again.ledger().completed_count(), 8);
}

#[test]
fn started_countdown_resumes_with_the_same_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/pomodoroData.json");
    let clock = TestClock::at(START);

    let mut engine = boot(&path, clock.clone(), SelectedTask::new());
    engine.set_duration(5, 0);
    engine.start();
    let deadline = read_snapshot(&path).end_time;
    assert_eq!(deadline, Some(START + 300_000));
    drop(engine);

    clock.advance(120_500);
    let resumed = boot(&path, clock.clone(), SelectedTask::new());
    assert_eq!(resumed.phase(), TimerPhase::Running);
    assert_eq!(resumed.display().formatted(), "03:00");
    assert_eq!(read_snapshot(&path).end_time, deadline);
}

#[test]
fn paused_countdown_resumes_idle_where_it_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoroData.json");
    let clock = TestClock::at(START);

    let mut engine = boot(&path, clock.clone(), SelectedTask::new());
    engine.start();
    clock.advance(65_000);
    engine.pause();
    drop(engine);

    clock.advance(3_600_000);
    let resumed = boot(&path, clock, SelectedTask::new());
    assert_eq!(resumed.phase(), TimerPhase::Idle);
    assert_eq!(resumed.display().formatted(), "23:55");
    assert_eq!(resumed.ledger().total_focus_seconds(), 65);
}

#[test]
fn corrupt_snapshot_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoroData.json");
    std::fs::write(&path, "{\"completedPomodoros\": \"many\"").unwrap();

    let engine = boot(&path, TestClock::at(START), SelectedTask::new());

    assert_eq!(engine.phase(), TimerPhase::Idle);
    assert_eq!(engine.display().formatted(), "25:00");
    assert_eq!(engine.ledger().completed_count(), 0);
    assert_eq!(read_snapshot(&path).initial_minutes, Some(25));
}

#[test]
fn zero_length_duration_on_disk_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoroData.json");
    write_snapshot(
        &path,
        serde_json::json!({
            "completedPomodoros": 1,
            "totalFocusTime": 60,
            "history": [],
            "initialMinutes": 0,
            "initialSeconds": 0,
        }),
    );

    let engine = boot(&path, TestClock::at(START), SelectedTask::new());

    assert_eq!(engine.config().initial_minutes(), 25);
    assert_eq!(engine.display().formatted(), "25:00");
    assert_eq!(engine.ledger().completed_count(), 1);
}
