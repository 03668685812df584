//! services/app/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the session is persisted between runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// A JSON file on disk; survives restarts.
    File,
    /// Process memory only; every run starts signed out.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub storage: StorageKind,
    pub log_level: Level,
    /// `None` leaves the HTTP client's own default in place.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- API and Storage Settings ---
        let api_base_url = base_url(
            "API_BASE_URL",
            var("API_BASE_URL").unwrap_or_else(|| "http://localhost:5000/api".to_string()),
        )?;

        let session_file = var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.dashboard-session.json"));

        let storage = match var("SESSION_STORAGE").as_deref().map(str::to_lowercase) {
            None => StorageKind::File,
            Some(kind) if kind == "file" => StorageKind::File,
            Some(kind) if kind == "memory" => StorageKind::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "SESSION_STORAGE".to_string(),
                    format!("'{}' is not one of file, memory", other),
                ))
            }
        };

        // --- Logging ---
        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Transport ---
        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            api_base_url,
            session_file,
            storage,
            log_level,
            request_timeout,
        })
    }
}

/// Accepts only http(s) URLs for the API base; `source` names where the value came from.
pub(crate) fn base_url(source: &str, url: String) -> Result<String, ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(ConfigError::InvalidValue(
            source.to_string(),
            format!("'{}' is not an http(s) URL", url),
        ))
    }
}
