//! Browser engine configuration types.
//!
//! These live outside `#[cfg(feature = "browser")]` so config parsing works
//! without the browser feature.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser engine configuration, scoped to one scrape session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Keep Chrome's sandbox enabled. Containers usually need this off.
    #[serde(default)]
    pub sandbox: bool,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default)]
    pub proxy: Option<String>,

    /// Page load timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// How long to wait for episode elements to appear, in seconds.
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout: u64,

    /// Pause after clicking "load more" before re-measuring, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Interval between selector checks while waiting, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    30
}

pub fn default_wait_timeout() -> u64 {
    15
}

pub fn default_settle_ms() -> u64 {
    2000
}

pub fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            sandbox: false,
            proxy: None,
            timeout: default_timeout(),
            wait_timeout: default_wait_timeout(),
            settle_ms: default_settle_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            chrome_args: Vec::new(),
            remote_url: None,
        }
    }
}

impl BrowserEngineConfig {
    /// Apply environment variable overrides.
    ///
    /// - `BROWSER_URL` - Remote Chrome DevTools URL
    /// - `SOCKS_PROXY` - SOCKS proxy for browser traffic
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("BROWSER_URL") {
            if !val.is_empty() {
                self.remote_url = Some(val);
            }
        }
        if let Ok(val) = std::env::var("SOCKS_PROXY") {
            if !val.is_empty() {
                self.proxy = Some(val);
            }
        }
        self
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout)
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowserEngineConfig::default();
        assert!(config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.wait_timeout(), Duration::from_secs(15));
        assert_eq!(config.settle_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BrowserEngineConfig =
            toml::from_str("headless = false\nsettle_ms = 500").unwrap();
        assert!(!config.headless);
        assert_eq!(config.settle_ms, 500);
        assert_eq!(config.wait_timeout, 15);
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = BrowserEngineConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
