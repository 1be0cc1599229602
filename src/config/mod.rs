use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend origin including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted session record
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Interval between refreshes of watched lists in seconds (default: 5)
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Emit a toast for every failed request
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long a toast stays visible in milliseconds (default: 3000)
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

impl NotificationConfig {
    pub fn display_for(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_ms: default_display_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_display_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbConfig {
    #[serde(default = "default_omdb_url")]
    pub base_url: String,
    /// OMDb API key; movie search is unavailable without one
    pub api_key: Option<String>,
    /// Image used when OMDb has no poster for a title
    #[serde(default = "default_placeholder_poster")]
    pub placeholder_poster: String,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_omdb_url(),
            api_key: None,
            placeholder_poster: default_placeholder_poster(),
        }
    }
}

fn default_omdb_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_placeholder_poster() -> String {
    "https://placehold.jp/100x150.png".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            polling: PollingConfig::default(),
            notifications: NotificationConfig::default(),
            omdb: OmdbConfig::default(),
        }
    }

    /// Path of the persisted session record
    pub fn session_file(&self) -> PathBuf {
        self.storage
            .data_dir
            .join(format!("{}.json", crate::session::SESSION_KEY))
    }
}
