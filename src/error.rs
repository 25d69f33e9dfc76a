//! Scrape session error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for scrape pipeline operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Errors that abort a scrape session.
///
/// None of these are retried. The `Display` text is what the observer sees
/// in the terminal `error` event.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to load {url}: {message}")]
    Navigation { url: String, message: String },
    #[error("Timed out after {timeout_secs}s waiting for selector '{selector}'")]
    SelectorTimeout { selector: String, timeout_secs: u64 },
    #[error("Failed to write snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Observer disconnected")]
    Cancelled,
}

impl ScrapeError {
    /// Build a snapshot error for the given path.
    pub fn snapshot(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Snapshot {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means nobody is listening any more.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScrapeError::Cancelled)
    }
}

#[cfg(feature = "browser")]
impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Browser(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_timeout_message() {
        let err = ScrapeError::SelectorTimeout {
            selector: ".sc-episode-teaser".to_string(),
            timeout_secs: 15,
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 15s waiting for selector '.sc-episode-teaser'"
        );
    }

    #[test]
    fn test_snapshot_message_includes_path() {
        let err = ScrapeError::snapshot(
            "_data/episodes.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("_data/episodes.json"));
        assert!(msg.contains("denied"));
        assert!(!err.is_cancelled());
    }
}
