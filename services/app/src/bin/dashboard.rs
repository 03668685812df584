//! services/app/src/bin/dashboard.rs

use app_lib::{
    adapters::{FileStore, MemoryStore, ReqwestTransport},
    cli::Cli,
    client::SessionContext,
    commands,
    config::{Config, StorageKind},
    error::AppError,
};
use clap::Parser;
use dashboard_core::ports::KeyValueStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Parse Arguments, Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api = %config.api_base_url, "configuration loaded");

    // --- 2. Initialize Adapters ---
    let transport = Arc::new(ReqwestTransport::new(
        config.api_base_url.as_str(),
        config.request_timeout,
    )?);
    let storage: Arc<dyn KeyValueStore> = match config.storage {
        StorageKind::File => {
            info!(path = %config.session_file.display(), "using file session storage");
            Arc::new(FileStore::new(config.session_file.clone()))
        }
        StorageKind::Memory => Arc::new(MemoryStore::new()),
    };

    // --- 3. Restore the Session & Run ---
    let context = SessionContext::init(transport, storage);
    commands::run(cli.command, &context).await
}
