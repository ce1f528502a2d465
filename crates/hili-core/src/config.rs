//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default account API URL (can be overridden at compile time via HILI_API_URL).
pub const DEFAULT_API_URL: &str = match option_env!("HILI_API_URL") {
    Some(url) => url,
    None => "https://api.hili.app",
};

/// Default Google OAuth client id (public, safe to expose; can be overridden
/// at compile time via HILI_GOOGLE_CLIENT_ID).
pub const DEFAULT_GOOGLE_CLIENT_ID: &str = match option_env!("HILI_GOOGLE_CLIENT_ID") {
    Some(id) => id,
    None => "1008734949255-c3efrof5a6tri4kh08tens0ckssfohqj.apps.googleusercontent.com",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Account API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Google OAuth client id used for the consent flow.
    #[serde(default = "default_google_client_id")]
    pub google_client_id: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_google_client_id() -> String {
    DEFAULT_GOOGLE_CLIENT_ID.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            google_client_id: DEFAULT_GOOGLE_CLIENT_ID.to_string(),
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
    /// Environment variables override file values.
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
        if let Ok(log_level) = std::env::var("HILI_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(api_url) = std::env::var("HILI_API_URL") {
            self.api_url = api_url;
        }
    }

    /// Get the API URL as a parsed URL.
    pub fn api_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_url).map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.google_client_id, DEFAULT_GOOGLE_CLIENT_ID);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "log_level": "debug",
            "api_url": "https://staging.hili.app"
        }"#;

        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_url, "https://staging.hili.app");
        // Missing fields fall back to defaults
        assert_eq!(config.google_client_id, DEFAULT_GOOGLE_CLIENT_ID);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = Config::default();
        config.log_level = "trace".to_string();

        config.save(&paths).unwrap();

        let loaded = Config::load(&paths).unwrap();
        assert_eq!(loaded.log_level, "trace");
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_config_api_url_parse() {
        let config = Config::default();
        let url = config.api_url().unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_config_invalid_url() {
        let mut config = Config::default();
        config.api_url = "not a valid url".to_string();

        let result = config.api_url();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_constants() {
        assert!(!DEFAULT_LOG_LEVEL.is_empty());
        assert!(!DEFAULT_API_URL.is_empty());
        assert!(DEFAULT_API_URL.starts_with("https://"));
        assert!(!DEFAULT_GOOGLE_CLIENT_ID.is_empty());
    }
}
