//! chromiumoxide (CDP) implementation of [`PageDriver`].

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserEngineConfig, DriverLauncher, PageDriver};
use crate::error::{ScrapeError, ScrapeResult};

/// Launches (or connects to) Chrome for each session.
pub struct ChromiumLauncher {
    config: BrowserEngineConfig,
}

impl ChromiumLauncher {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    pub fn new(config: BrowserEngineConfig) -> Self {
        Self { config }
    }

    /// Find Chrome executable.
    fn find_chrome() -> ScrapeResult<PathBuf> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        // Check if in PATH via `which`
        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        debug!("Found Chrome in PATH: {}", path);
                        return Ok(PathBuf::from(path));
                    }
                }
            }
        }

        Err(ScrapeError::Browser(
            "Chrome/Chromium not found. Install it or set BROWSER_URL to a remote instance"
                .to_string(),
        ))
    }

    async fn launch_local(&self) -> ScrapeResult<(Browser, JoinHandle<()>)> {
        info!("Launching browser (headless={})", self.config.headless);

        let chrome_path = Self::find_chrome()?;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(self.config.navigation_timeout());

        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }

        if !self.config.sandbox {
            builder = builder
                .arg("--no-sandbox")
                .arg("--disable-setuid-sandbox");
        }

        if let Some(ref proxy) = self.config.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        builder = builder
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-gpu");

        for arg in &self.config.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| ScrapeError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, handler) = Browser::launch(config).await?;
        Ok((browser, spawn_handler(handler)))
    }

    /// Connect to a remote Chrome instance.
    async fn connect_remote(&self, url: &str) -> ScrapeResult<(Browser, JoinHandle<()>)> {
        info!("Connecting to remote browser at {}", url);

        // Get WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .timeout(self.config.navigation_timeout())
            .send()
            .await
            .map_err(|e| ScrapeError::Browser(format!("Failed to reach remote browser: {}", e)))?
            .json()
            .await
            .map_err(|e| ScrapeError::Browser(format!("Bad browser version info: {}", e)))?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ScrapeError::Browser("No webSocketDebuggerUrl in response".into()))?;

        debug!("Connecting to WebSocket: {}", ws_url);

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: self.config.navigation_timeout(),
            ..Default::default()
        };

        let (browser, handler) = Browser::connect_with_config(ws_url, handler_config).await?;
        Ok((browser, spawn_handler(handler)))
    }
}

fn spawn_handler(mut handler: chromiumoxide::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    })
}

#[async_trait]
impl DriverLauncher for ChromiumLauncher {
    async fn launch(&self) -> ScrapeResult<Box<dyn PageDriver>> {
        let remote = self.config.remote_url.clone();
        let (browser, handler) = match remote {
            Some(ref url) => self.connect_remote(url).await?,
            None => self.launch_local().await?,
        };

        let page = browser.new_page("about:blank").await;
        let mut driver = ChromiumDriver {
            browser: Some(browser),
            page: None,
            handler,
            owns_process: remote.is_none(),
            navigation_timeout: self.config.navigation_timeout(),
        };

        match page {
            Ok(page) => {
                driver.page = Some(page);
                Ok(Box::new(driver))
            }
            Err(e) => {
                driver.close().await;
                Err(e.into())
            }
        }
    }
}

/// One browser and the single page a session works in.
pub struct ChromiumDriver {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: JoinHandle<()>,
    /// False when connected to a remote browser we must not shut down.
    owns_process: bool,
    navigation_timeout: Duration,
}

impl ChromiumDriver {
    fn page(&self) -> ScrapeResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapeError::Browser("Browser page already closed".to_string()))
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        let page = self.page()?;
        info!("Navigating to {}", url);

        let navigation_error = |message: String| ScrapeError::Navigation {
            url: url.to_string(),
            message,
        };

        match tokio::time::timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(navigation_error(e.to_string())),
            Err(_) => Err(navigation_error(format!(
                "timed out after {}s",
                self.navigation_timeout.as_secs()
            ))),
        }
    }

    async fn count(&mut self, selector: &str) -> ScrapeResult<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );
        let count: usize = self
            .page()?
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| ScrapeError::Browser(format!("Unexpected element count: {}", e)))?;
        Ok(count)
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        Ok(self.page()?.content().await?)
    }

    async fn click_first(&mut self, selector: &str) -> ScrapeResult<bool> {
        let elements = self.page()?.find_elements(selector).await?;
        match elements.first() {
            Some(element) => {
                element.click().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }
        if let Some(mut browser) = self.browser.take() {
            if self.owns_process {
                if let Err(e) = browser.close().await {
                    warn!("Failed to close browser cleanly: {}", e);
                }
                let _ = browser.wait().await;
            }
            debug!("Browser released");
        }
        self.handler.abort();
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        // Dropping the Browser kills a launched child process.
        self.handler.abort();
    }
}
