//! services/app/src/error.rs
//!
//! Defines the primary error type for the dashboard client.

use crate::config::ConfigError;
use crate::views::{DashboardError, ViewError};
use dashboard_core::guard::Route;

/// The primary error type for the `app` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A protected command was run without a session.
    #[error("Not signed in; redirected to {0}")]
    Redirect(Route),

    /// A form submission was refused or failed.
    #[error("{0}")]
    View(#[from] ViewError),

    /// A dashboard action failed.
    #[error("{0}")]
    Dashboard(#[from] DashboardError),

    /// Represents an error while building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a JSON serialization failure outside the ports.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
