use std::env;
use std::path::Path;

use crate::errors::RelayError;

/// Default LINE Messaging API host.
pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me";

/// Dotenv file consulted by [`AppConfig::load`] before reading the environment.
pub const ENV_FILE: &str = "line.env";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub channel_secret: String,
    pub channel_token: String,
    pub task_queue_url: Option<String>,
    pub line_api_base_url: String,
}

impl AppConfig {
    /// Seed the process environment from `line.env` when present, then read it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the env file is unreadable or a credential is missing.
    pub fn load() -> Result<Self, RelayError> {
        if Path::new(ENV_FILE).exists() {
            dotenvy::from_filename(ENV_FILE)
                .map_err(|e| RelayError::ConfigError(format!("{ENV_FILE}: {e}")))?;
        }
        Self::from_env()
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if `LINE_BOT_CHANNEL_SECRET` or
    /// `LINE_BOT_CHANNEL_TOKEN` is missing or blank.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| RelayError::ConfigError(format!("{key} is not set")))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            channel_secret: required("LINE_BOT_CHANNEL_SECRET")?,
            channel_token: required("LINE_BOT_CHANNEL_TOKEN")?,
            task_queue_url: optional("TASK_QUEUE_URL"),
            line_api_base_url: optional("LINE_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_LINE_API_BASE_URL.to_string()),
        })
    }
}
