//! HTTP routes driven end to end through the engine task

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::runtime::Handle;
use tower::ServiceExt;

use focus_timer::{
    create_router,
    state::{AppState, SelectedTask},
    storage::MemoryStore,
    tasks::{engine_channel, engine_task, tick_source::TICK_PERIOD, IntervalTickSource},
    timer::{EngineParts, SystemClock, TimerEngine},
};

fn app() -> Router {
    let (engine_tx, engine_rx) = engine_channel();
    let selected_task = SelectedTask::new();
    let engine = TimerEngine::initialize(EngineParts {
        clock: Arc::new(SystemClock),
        store: Box::new(MemoryStore::new()),
        ticker: Box::new(IntervalTickSource::new(engine_tx.clone(), Handle::current(), TICK_PERIOD)),
        tasks: Arc::new(selected_task.clone()),
    });
    let display_rx = engine.subscribe_display();
    tokio::spawn(engine_task(engine, engine_rx));

    create_router(Arc::new(AppState::new(
        engine_tx,
        display_rx,
        selected_task,
        0,
        "127.0.0.1".to_string(),
    )))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn start_pause_and_reset() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["display"]["running"], true);

    let (_, body) = call(&app, Method::POST, "/start", None).await;
    assert_eq!(body["status"], "running");

    let (_, body) = call(&app, Method::POST, "/pause", None).await;
    assert_eq!(body["status"], "idle");
    assert!(body["timer"]["deadline"].is_null());

    let (_, body) = call(&app, Method::POST, "/toggle", None).await;
    assert_eq!(body["status"], "running");

    let (_, body) = call(&app, Method::POST, "/reset", None).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["display"], "25:00");
}

#[tokio::test]
async fn duration_edits_are_clamped() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/duration",
        Some(serde_json::json!({ "minutes": 150, "seconds": 75 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["initial_minutes"], 99);
    assert_eq!(body["timer"]["initial_seconds"], 59);
    assert_eq!(body["display"], "99:59");

    let (_, body) = call(&app, Method::PUT, "/duration", Some(serde_json::json!({ "time": "12:30" }))).await;
    assert_eq!(body["display"], "12:30");

    let (status, _) = call(&app, Method::PUT, "/duration", Some(serde_json::json!({ "time": "soon" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&app, Method::GET, "/display", None).await;
    assert_eq!(body["formatted"], "12:30");
    assert_eq!(body["running"], false);
}

#[tokio::test]
async fn status_reports_settings_and_last_action() {
    let app = app();

    call(&app, Method::PUT, "/sound", Some(serde_json::json!({ "enabled": false }))).await;
    let (status, _) = call(&app, Method::PUT, "/task", Some(serde_json::json!({ "taskId": 17 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["sound_enabled"], false);
    assert_eq!(body["selected_task"], 17);
    assert_eq!(body["last_action"], "select-task");
    assert_eq!(body["total_focus"], "0m");
    assert_eq!(body["display"], "25:00");
}

#[tokio::test]
async fn visibility_refresh_and_history() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/visible", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");

    let (status, body) = call(&app, Method::GET, "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert!(body["records"].as_array().unwrap().is_empty());

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
