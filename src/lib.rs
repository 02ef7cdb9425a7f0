pub mod api; // HTTP router, middleware, server lifecycle
pub mod config;
pub mod core_state; // Shared state: pool + token service + config
pub mod crypto;
pub mod db;
pub mod models;

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ClinicConfig, ConfigError};
use crate::core_state::{CoreError, CoreState};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Initialization failed: {0}")]
    Core(#[from] CoreError),

    #[error("Cannot bind server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load configuration from the environment, open the database and serve
/// until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    let config = ClinicConfig::from_env()?;

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    tracing::debug!(?config, "Configuration loaded");

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let core = CoreState::initialize(config).await?;
    let server = api::start_server_on(core, addr).await?;

    tracing::info!(addr = %server.session.server_addr, "Clinic ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }

    server.stop().await;
    Ok(())
}
