//! services/app/src/cli.rs
//!
//! Command-line surface of the `dashboard` binary.

use crate::config::{self, Config, ConfigError, StorageKind};
use clap::{Parser, Subcommand};
use dashboard_core::domain::{Country, Role};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Sign in and manage the item dashboard")]
pub struct Cli {
    /// Base URL of the API (overrides API_BASE_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// File the session is persisted to (overrides SESSION_FILE).
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Keep the session in memory only for this run.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration.
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_url {
            config.api_base_url = config::base_url("--api-url", url.clone())?;
        }
        if let Some(path) = &self.session_file {
            config.session_file = path.clone();
        }
        if self.ephemeral {
            config.storage = StorageKind::Memory;
        }
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session.
    Login {
        username: String,
        #[arg(long, env = "DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account. Does not sign in.
    Register {
        username: String,
        #[arg(long, env = "DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long, default_value_t = Role::Viewer)]
        role: Role,
        #[arg(long)]
        country: Option<Country>,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is signed in.
    Whoami {
        /// Print the full user record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Change the country preference.
    Country { country: Country },
    /// List or change items.
    Items {
        #[command(subcommand)]
        action: ItemsCommand,
    },
    /// Show which view a path resolves to for the current session.
    Open { path: String },
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    List,
    Add { name: String },
    Edit { id: String, name: String },
    Delete {
        id: String,
        /// Skip the confirmation question.
        #[arg(long, short)]
        yes: bool,
    },
}
