//! Focus Timer - a drift-free countdown engine behind a small HTTP daemon
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::{net::TcpListener, runtime::Handle};
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    services::completion_notifier_task,
    state::{AppState, SelectedTask},
    storage::{JsonFileStore, MemoryStore, SnapshotStore},
    tasks::{build_tick_source, engine_channel, engine_task, wake_up_recovery_task},
    timer::{Clock, EngineParts, SystemClock, TimerEngine},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));

    let store: Box<dyn SnapshotStore> = if config.ephemeral {
        info!("Ephemeral mode, timer state is kept in memory only");
        Box::new(MemoryStore::new())
    } else {
        let path = config.snapshot_path();
        info!("Timer state file: {}", path.display());
        Box::new(JsonFileStore::new(path))
    };

    // One queue carries wake-ups and user actions to the engine
    let (engine_tx, engine_rx) = engine_channel();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let selected_task = SelectedTask::new();

    let ticker = build_tick_source(engine_tx.clone(), Handle::current(), !config.fallback_ticker);
    let engine = TimerEngine::initialize(EngineParts {
        clock: Arc::clone(&clock),
        store,
        ticker,
        tasks: Arc::new(selected_task.clone()),
    });

    info!(
        "Timer at {} ({:?}), {} sessions completed",
        engine.display().formatted(),
        engine.phase(),
        engine.ledger().completed_count()
    );

    let display_rx = engine.subscribe_display();
    let completions = engine.subscribe_completions();

    // Start the background tasks
    tokio::spawn(completion_notifier_task(completions, config.sound_command.clone()));
    tokio::spawn(wake_up_recovery_task(
        engine_tx.clone(),
        Arc::clone(&clock),
        config.resume_check_period(),
    ));
    tokio::spawn(engine_task(engine, engine_rx));

    let state = Arc::new(AppState::new(
        engine_tx,
        display_rx,
        selected_task,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start     - Start the countdown");
    info!("  POST /pause     - Pause the countdown");
    info!("  POST /toggle    - Start or pause");
    info!("  POST /reset     - Reset to the configured duration");
    info!("  POST /visible   - Refresh after a client becomes visible");
    info!("  PUT  /duration  - Set duration ({{minutes, seconds}} or {{time: \"MM:SS\"}})");
    info!("  PUT  /sound     - Enable or disable the completion sound");
    info!("  PUT  /task      - Select the task to credit");
    info!("  GET  /status    - Timer status and totals");
    info!("  GET  /display   - Current display time");
    info!("  GET  /history   - Completed sessions");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
