//! Client configuration
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or an explicit file)
//! 3. `APPRAISE_*` environment variables (`APPRAISE_API_URL`, ...)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppraiseError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Effective client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, without trailing slash
    pub api_url: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Where `session.json` lives; platform config dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load from the default config file location and environment
    pub fn load() -> Result<Self> {
        let file = default_config_dir().map(|dir| dir.join("config.toml"));
        Self::load_from(file.as_deref())
    }

    /// Load with an explicit (optional) config file
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        if let Some(path) = file {
            debug!("Reading config from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let loaded: ClientConfig = builder
            .add_source(config::Environment::with_prefix("APPRAISE"))
            .build()?
            .try_deserialize()?;

        loaded.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AppraiseError::Config(config::ConfigError::Message(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            ))));
        }
        if self.timeout_secs == 0 {
            return Err(AppraiseError::Config(config::ConfigError::Message(
                "timeout_secs must be greater than zero".to_string(),
            )));
        }
        Ok(self)
    }

    /// Override the API URL (command-line flag)
    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_url = url.to_string();
        self.validated()
    }

    /// Directory holding persisted session state
    pub fn session_dir(&self) -> Result<PathBuf> {
        match &self.session_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_config_dir().ok_or_else(|| {
                AppraiseError::Config(config::ConfigError::Message(
                    "Failed to determine config directory".to_string(),
                ))
            }),
        }
    }

    /// Render as TOML for `config show`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppraiseError::Other(e.to_string()))
    }
}

/// Platform config directory (`~/.config/appraise` on Linux)
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "appraise", "appraise").map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var("APPRAISE_API_URL");
        std::env::remove_var("APPRAISE_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ClientConfig::load_from(None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.session_dir.is_none());
    }

    #[test]
    #[serial]
    fn test_file_then_env_precedence() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.toml");
        fs::write(
            &file,
            "api_url = \"https://hr.example.com/api/\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let config = ClientConfig::load_from(Some(&file)).unwrap();
        assert_eq!(config.api_url, "https://hr.example.com/api");
        assert_eq!(config.timeout_secs, 10);

        std::env::set_var("APPRAISE_API_URL", "http://127.0.0.1:9000/api");
        let config = ClientConfig::load_from(Some(&file)).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout_secs, 10);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_file_is_fine() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let config = ClientConfig::load_from(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = ClientConfig::default().with_api_url("localhost:8000");
        assert!(matches!(result, Err(AppraiseError::Config(_))));
    }

    #[test]
    fn test_toml_rendering() {
        let rendered = ClientConfig::default().to_toml().unwrap();
        assert!(rendered.contains("api_url = \"http://localhost:8000/api\""));
        assert!(rendered.contains("timeout_secs = 30"));
    }
}
