//! Configuration management for the assistant client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default channel (WebSocket) endpoint.
pub const DEFAULT_CHANNEL_URL: &str = "wss://assistant.example.com/ws";

/// Default request (HTTP) endpoint for the fallback path.
pub const DEFAULT_REQUEST_URL: &str = "https://assistant.example.com/api";

/// Default delay before a reconnection attempt, in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5000;

/// Default maximum outbound message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 2000;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
///
/// Loaded once at startup and treated as immutable afterwards; the channel
/// and fallback clients receive their slices of it at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Channel (WebSocket) endpoint URL.
    #[serde(default = "default_channel_url")]
    pub channel_url: String,
    /// Request (HTTP) endpoint URL for the fallback path.
    #[serde(default = "default_request_url")]
    pub request_url: String,
    /// Delay before a reconnection attempt, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Maximum outbound message length, in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Default UI language, consumed by the rendering layer.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Default UI theme, consumed by the rendering layer.
    #[serde(default = "default_theme")]
    pub default_theme: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_channel_url() -> String {
    DEFAULT_CHANNEL_URL.to_string()
}

fn default_request_url() -> String {
    DEFAULT_REQUEST_URL.to_string()
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

fn default_language() -> String {
    "en".to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_url: default_channel_url(),
            request_url: default_request_url(),
            retry_delay_ms: default_retry_delay_ms(),
            max_message_length: default_max_message_length(),
            default_language: default_language(),
            default_theme: default_theme(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    ///
    /// Environment variables override values from the file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(url) = std::env::var("ASSISTANT_CHANNEL_URL") {
            self.channel_url = url;
        }
        if let Ok(url) = std::env::var("ASSISTANT_REQUEST_URL") {
            self.request_url = url;
        }
        if let Ok(log_level) = std::env::var("ASSISTANT_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Get the channel URL as a parsed URL.
    pub fn channel_url(&self) -> CoreResult<Url> {
        Url::parse(&self.channel_url).map_err(CoreError::from)
    }

    /// Get the request URL as a parsed URL.
    pub fn request_url(&self) -> CoreResult<Url> {
        Url::parse(&self.request_url).map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn clear_env() {
        std::env::remove_var("ASSISTANT_CHANNEL_URL");
        std::env::remove_var("ASSISTANT_REQUEST_URL");
        std::env::remove_var("ASSISTANT_LOG_LEVEL");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.channel_url, DEFAULT_CHANNEL_URL);
        assert_eq!(config.request_url, DEFAULT_REQUEST_URL);
        assert_eq!(config.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(config.max_message_length, DEFAULT_MAX_MESSAGE_LENGTH);
        assert_eq!(config.default_language, "en");
        assert_eq!(config.default_theme, "light");
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "channel_url": "wss://staging.example.com/ws",
            "retry_delay_ms": 1000,
            "log_level": "debug"
        }"#;

        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.channel_url, "wss://staging.example.com/ws");
        assert_eq!(config.retry_delay_ms, 1000);
        assert_eq!(config.log_level, "debug");
        // Missing fields fall back to defaults
        assert_eq!(config.request_url, DEFAULT_REQUEST_URL);
        assert_eq!(config.max_message_length, DEFAULT_MAX_MESSAGE_LENGTH);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        clear_env();
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = Config::default();
        config.retry_delay_ms = 250;
        config.default_theme = "dark".to_string();

        config.save(&paths).unwrap();

        let loaded = Config::load(&paths).unwrap();
        assert_eq!(loaded.retry_delay_ms, 250);
        assert_eq!(loaded.default_theme, "dark");
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        clear_env();
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.channel_url, DEFAULT_CHANNEL_URL);
    }

    #[test]
    fn test_config_channel_url_parse() {
        let config = Config::default();
        let url = config.channel_url().unwrap();
        assert_eq!(url.scheme(), "wss");
    }

    #[test]
    fn test_config_request_url_parse() {
        let config = Config::default();
        let url = config.request_url().unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_config_invalid_url() {
        let mut config = Config::default();
        config.channel_url = "not a valid url".to_string();

        let result = config.channel_url();
        assert!(result.is_err());
    }
}
