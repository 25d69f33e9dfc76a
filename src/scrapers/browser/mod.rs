//! Browser automation for rendering the episode listing.
//!
//! The pagination controller talks to the page through [`PageDriver`], so it
//! can run against chromiumoxide (CDP) in production and a simulated source in
//! tests. A driver belongs to exactly one session and must be closed when the
//! session ends.

#[cfg(feature = "browser")]
mod chromium;
mod config;
#[cfg(test)]
pub(crate) mod fake;

#[cfg(feature = "browser")]
pub use chromium::{ChromiumDriver, ChromiumLauncher};
pub use config::{
    default_headless, default_poll_interval_ms, default_settle_ms, default_timeout,
    default_wait_timeout, BrowserEngineConfig,
};

use async_trait::async_trait;

use crate::error::ScrapeResult;

/// Page-level operations needed to harvest a paginated listing.
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate to `url` and wait for the document to load.
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()>;

    /// Number of elements currently matching `selector`.
    async fn count(&mut self, selector: &str) -> ScrapeResult<usize>;

    /// Serialized HTML of the current page state.
    async fn content(&mut self) -> ScrapeResult<String>;

    /// Click the first element matching `selector`. Returns false if there is none.
    async fn click_first(&mut self, selector: &str) -> ScrapeResult<bool>;

    /// Release the browser. Safe to call more than once.
    async fn close(&mut self);
}

/// Creates one driver per scrape session.
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    async fn launch(&self) -> ScrapeResult<Box<dyn PageDriver>>;
}

/// Launcher used when the crate is built without browser support.
#[cfg(not(feature = "browser"))]
pub struct ChromiumLauncher {
    #[allow(dead_code)]
    config: BrowserEngineConfig,
}

#[cfg(not(feature = "browser"))]
impl ChromiumLauncher {
    pub fn new(config: BrowserEngineConfig) -> Self {
        Self { config }
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl DriverLauncher for ChromiumLauncher {
    async fn launch(&self) -> ScrapeResult<Box<dyn PageDriver>> {
        Err(crate::error::ScrapeError::Browser(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        ))
    }
}
