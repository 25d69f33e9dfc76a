//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let snapshot = ServeFile::new(&state.settings.snapshot_path);

    Router::new()
        .route("/health", get(handlers::health))
        // Progress stream for a new scrape session
        .route("/api/scrape", get(handlers::scrape_stream))
        .route("/api/status", get(handlers::api_status))
        // Last written snapshot, without starting a scrape
        .route_service("/episodes.json", snapshot)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
