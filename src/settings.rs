//! JSON settings file: destination database, API endpoint and retry overrides.

use crate::retry::{RetryPolicy, RetryPolicySettings, FETCH_RETRY, PERSIST_RETRY};
use crate::store::guard::DEFAULT_SCAN_CHUNK_SIZE;
use crate::types::secret::Secret;
use crate::weather_api::client::{DEFAULT_HISTORY_URL, DEFAULT_REQUEST_TIMEOUT};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse settings file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Invalid settings in '{path}': {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Could not determine the system configuration directory")]
    ConfigDirResolution,
}

/// Connection parameters of the destination PostgreSQL table.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: Secret,
    pub database: String,
    pub schema: String,
    pub table: String,
}

fn default_port() -> u16 {
    5432
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_history_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_history_url() -> String {
    DEFAULT_HISTORY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_history_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Overrides for the retry policies and the duplicate-scan chunk size.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrySettings {
    pub fetch: Option<RetryPolicySettings>,
    pub persist: Option<RetryPolicySettings>,
    pub scan_chunk_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Settings {
    /// Reads and validates the settings file at `path`.
    ///
    /// # Errors
    ///
    /// * [`SettingsError::Read`] if the file cannot be read.
    /// * [`SettingsError::Parse`] if it is not valid JSON of the expected shape.
    /// * [`SettingsError::Invalid`] if a retry override asks for zero attempts or a zero
    ///   chunk size.
    pub async fn load(path: &Path) -> Result<Settings, SettingsError> {
        debug!("Loading settings from {}", path.display());
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SettingsError::Read(path.to_path_buf(), e))?;
        let settings: Settings = serde_json::from_str(&raw)
            .map_err(|e| SettingsError::Parse(path.to_path_buf(), e))?;
        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<(), SettingsError> {
        let invalid = |message: &str| SettingsError::Invalid {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.retry.fetch.is_some_and(|p| p.max_attempts == 0) {
            return Err(invalid("retry.fetch.max_attempts must be at least 1"));
        }
        if self.retry.persist.is_some_and(|p| p.max_attempts == 0) {
            return Err(invalid("retry.persist.max_attempts must be at least 1"));
        }
        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs must be at least 1"));
        }
        if self.retry.scan_chunk_size == Some(0) {
            return Err(invalid("retry.scan_chunk_size must be at least 1"));
        }
        Ok(())
    }

    pub fn fetch_retry(&self) -> RetryPolicy {
        self.retry.fetch.map(RetryPolicy::from).unwrap_or(FETCH_RETRY)
    }

    pub fn persist_retry(&self) -> RetryPolicy {
        self.retry.persist.map(RetryPolicy::from).unwrap_or(PERSIST_RETRY)
    }

    pub fn scan_chunk_size(&self) -> usize {
        self.retry.scan_chunk_size.unwrap_or(DEFAULT_SCAN_CHUNK_SIZE)
    }
}
