//! Source listing configuration.
//!
//! Describes where the episode listing lives and which structural locations
//! on the page hold each field.

use serde::{Deserialize, Serialize};

/// Default listing page.
pub const DEFAULT_SOURCE_URL: &str = "https://founderspodcast.com/episodes";

/// Separator between the date and duration parts of the time text.
pub const DEFAULT_DELIMITER: &str = " | ";

/// Source listing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Listing page URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// CSS selectors for the listing structure.
    #[serde(default)]
    pub selectors: SelectorConfig,
    /// Separator between date and duration in the time text.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Stop after this many "load more" clicks (None = until the source runs dry).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
}

fn default_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            selectors: SelectorConfig::default(),
            delimiter: default_delimiter(),
            max_expansions: None,
        }
    }
}

impl SourceConfig {
    /// Apply environment variable overrides.
    ///
    /// - `PODHARVEST_SOURCE_URL` - Listing page URL
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("PODHARVEST_SOURCE_URL") {
            if !val.is_empty() {
                self.url = val;
            }
        }
        self
    }
}

/// CSS selectors locating episode fields. Field selectors are relative to
/// the episode element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub episode: String,
    pub title: String,
    pub description: String,
    pub time: String,
    /// The "load more" control.
    pub load_more: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            episode: ".sc-episode-teaser".to_string(),
            title: ".sc-episode-teaser-title a".to_string(),
            description: ".sc-episode-teaser-description".to_string(),
            time: ".sc-episode-teaser-time".to_string(),
            load_more: ".button.button-secondary".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_single_selector() {
        let config: SourceConfig = serde_json::from_str(
            r#"{"url": "https://example.com/eps", "selectors": {"load_more": "button.more"}}"#,
        )
        .unwrap();
        assert_eq!(config.url, "https://example.com/eps");
        assert_eq!(config.selectors.load_more, "button.more");
        assert_eq!(config.selectors.episode, ".sc-episode-teaser");
        assert_eq!(config.delimiter, " | ");
        assert_eq!(config.max_expansions, None);
    }
}
