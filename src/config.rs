//! Configuration management for podharvest using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scrapers::{BrowserEngineConfig, SourceConfig};

/// Default snapshot location, relative to the config file (or CWD).
pub const DEFAULT_SNAPSHOT_PATH: &str = "_data/episodes.json";

/// Default server bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub browser: BrowserEngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// Where the checkpoint snapshot is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
}

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceConfig,
    pub browser: BrowserEngineConfig,
    /// Absolute (or CWD-relative) snapshot file path.
    pub snapshot_path: PathBuf,
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            browser: BrowserEngineConfig::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Config {
    /// Load configuration, discovering the file with prefer.
    pub async fn load() -> Self {
        // Use prefer for file discovery, then parse with serde
        match prefer::load("podharvest").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Resolve into settings, applying environment overrides.
    ///
    /// - `PODHARVEST_SNAPSHOT` - Snapshot file path
    pub fn into_settings(self) -> Settings {
        let base_dir = self.base_dir().unwrap_or_else(|| PathBuf::from("."));

        let snapshot = std::env::var("PODHARVEST_SNAPSHOT")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.output.snapshot_path.clone())
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string());
        let snapshot_path = self.resolve_path(&snapshot, &base_dir);

        Settings {
            bind: self
                .server
                .bind
                .clone()
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            snapshot_path,
            source: self.source.with_env_overrides(),
            browser: self.browser.with_env_overrides(),
        }
    }
}

/// Load settings from an explicit config path, or discover one.
pub async fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?,
        None => Config::load().await,
    };
    Ok(config.into_settings())
}
