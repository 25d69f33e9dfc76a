//! Web server streaming scrape progress to a single observer.
//!
//! Provides:
//! - `GET /api/scrape` - start a session and stream progress events (SSE)
//! - `GET /episodes.json` - the last written snapshot
//! - `GET /api/status` - whether a session is running and the snapshot size

mod handlers;
mod routes;

pub use handlers::observe;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::scrapers::{ChromiumLauncher, DriverLauncher};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub launcher: Arc<dyn DriverLauncher>,
    /// Held for the lifetime of a scrape session (only one can run at a time).
    pub session_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(settings: Settings, launcher: Arc<dyn DriverLauncher>) -> Self {
        Self {
            settings: Arc::new(settings),
            launcher,
            session_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let launcher = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    let app = create_router(AppState::new(settings, launcher));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
