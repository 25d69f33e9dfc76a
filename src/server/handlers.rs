//! HTTP handlers: the progress stream and status endpoints.

use std::convert::Infallible;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{error, info};

use super::AppState;
use crate::progress::{self, ProgressEvent, ProgressReceiver};
use crate::scrapers::run_session;
use crate::storage;

/// Events buffered between the session and a slow client.
const EVENT_BUFFER: usize = 16;

/// Sent when the session task ends without reporting an outcome.
pub const SESSION_LOST: &str = "scrape session ended without a result";

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Start a scrape session and stream its progress as server-sent events.
///
/// Only one session runs at a time; a second request gets 409. Dropping the
/// response stream cancels the session.
pub async fn scrape_stream(State(state): State<AppState>) -> Response {
    let guard = match state.session_lock.clone().try_lock_owned() {
        Ok(guard) => guard,
        Err(_) => {
            return (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "error": "A scrape session is already running",
                })),
            )
                .into_response()
        }
    };

    info!("Starting scrape session");
    let (publisher, rx) = progress::channel(EVENT_BUFFER);
    let settings = state.settings.clone();
    let launcher = state.launcher.clone();
    tokio::spawn(async move {
        let _guard = guard;
        let _ = run_session(&settings, launcher.as_ref(), publisher).await;
    });

    let events = observe(rx).map(|event| {
        Ok::<_, Infallible>(
            Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data(SESSION_LOST)),
        )
    });

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

/// Forward events until the terminal one.
///
/// If the channel closes first, the session died without reporting; a
/// synthetic `error` event is emitted so the observer always sees an outcome.
pub fn observe(rx: ProgressReceiver) -> impl Stream<Item = ProgressEvent> {
    stream::unfold(Some(rx), |state| async move {
        let mut rx = state?;
        match rx.recv().await {
            Some(event) if event.is_terminal() => Some((event, None)),
            Some(event) => Some((event, Some(rx))),
            None => {
                error!("Scrape session ended without a terminal event");
                Some((
                    ProgressEvent::Error {
                        error: SESSION_LOST.to_string(),
                    },
                    None,
                ))
            }
        }
    })
}

/// Session and snapshot status.
pub async fn api_status(State(state): State<AppState>) -> Response {
    let running = state.session_lock.try_lock().is_err();
    let path = &state.settings.snapshot_path;

    match storage::read_snapshot(path) {
        Ok(episodes) => Json(serde_json::json!({
            "running": running,
            "snapshot_path": path.display().to_string(),
            "episodes": episodes.len(),
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
