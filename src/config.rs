//! Configuration management.
//!
//! Configuration lives at `~/.pixsplit/config.json`.
//!
//! # Priority
//!
//! 1. Explicit config file values
//! 2. Environment variables (`PIXSPLIT_*` prefix)
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `PIXSPLIT_BOT_TOKEN` → `bot_token`
//! - `PIXSPLIT_ADMIN_CHAT_ID` → `admin_chat_id`
//! - `PIXSPLIT_LOG_LEVEL` → `observability.log_level`
//! - `PIXSPLIT_LOG_FORMAT` → `observability.log_format`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".pixsplit"),
        |dirs| dirs.home_dir().join(".pixsplit"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" for structured JSON, "pretty" for human-readable
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Top-level bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Telegram Bot API token
    #[serde(default)]
    pub bot_token: String,

    /// Chat that receives forwarded suggestions
    #[serde(default)]
    pub admin_chat_id: i64,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from an explicit path (used by tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config at {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if self.bot_token.is_empty() {
            if let Ok(token) = std::env::var("PIXSPLIT_BOT_TOKEN") {
                self.bot_token = token;
            }
        }
        if self.admin_chat_id == 0 {
            if let Ok(id) = std::env::var("PIXSPLIT_ADMIN_CHAT_ID") {
                if let Ok(id) = id.parse() {
                    self.admin_chat_id = id;
                }
            }
        }
        if let Ok(level) = std::env::var("PIXSPLIT_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("PIXSPLIT_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.bot_token.is_empty(),
            "bot_token not set: add it to {} or export PIXSPLIT_BOT_TOKEN",
            config_path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn observability_defaults() {
        let obs = ObservabilityConfig::default();
        assert_eq!(obs.log_level, "info");
        assert_eq!(obs.log_format, "pretty");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut f = fs::File::create(&path).unwrap();
        write!(
            f,
            r#"{{"bot_token": "123:ABC", "admin_chat_id": 7, "observability": {{"log_level": "debug"}}}}"#
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bot_token, "123:ABC");
        assert_eq!(config.admin_chat_id, 7);
        assert_eq!(config.observability.log_level, "debug");
        // Unspecified fields keep their defaults
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn missing_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"admin_chat_id": 7}"#).unwrap();

        // Only meaningful when the env override is not set in the test
        // environment.
        if std::env::var("PIXSPLIT_BOT_TOKEN").is_err() {
            assert!(Config::load_from(&path).is_err());
        }
    }

    #[test]
    fn invalid_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
