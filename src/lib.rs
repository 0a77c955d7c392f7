pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod panels;
pub mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::client::{ClientError, ResourceClient};
use crate::config::{AppConfig, ConfigError};
use crate::dashboard::{ManagerDashboard, PantryDashboard};
use crate::store::InMemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start the process: logging, configuration, and outside production
/// the dev API server over seeded demo data. The dashboards are loaded
/// once as a startup check. Runs until Ctrl-C when a server is up.
pub async fn run() -> Result<(), RunError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        mode = config.mode.as_str(),
        api_url = %config.api_base_url,
        "{} starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let server = if config.is_production() {
        None
    } else {
        let store = Arc::new(InMemoryStore::seeded());
        Some(api::start_dev_api_server(store, config.dev_server_addr).await?)
    };

    let client = ResourceClient::from_config(&config)?;
    startup_check(client).await;

    let Some(server) = server else {
        return Ok(());
    };
    tracing::info!(url = %server.base_url(), "Serving dev API, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.map_err(RunError::Signal)?;
    server.stop().await;
    Ok(())
}

/// Load the manager and pantry dashboards concurrently and log what came back.
async fn startup_check(client: ResourceClient) {
    let mut manager = ManagerDashboard::new(client.clone());
    let mut pantry = PantryDashboard::new(client);

    let (manager_result, pantry_result) = tokio::join!(manager.load(), pantry.load());

    match manager_result {
        Ok(()) => tracing::info!(
            patients = manager.patients.patients().len(),
            diet_charts = manager.diet_charts.charts().len(),
            deliveries = manager.deliveries.deliveries().len(),
            delivery_success_rate = manager.performance().map(|p| p.delivery_success_rate),
            "Manager dashboard ready"
        ),
        Err(e) => tracing::warn!(error = %e, "Manager dashboard failed to load"),
    }
    match pantry_result {
        Ok(()) => tracing::info!(
            tasks = pantry.preparation.tasks().len(),
            personnel = pantry.personnel.personnel().len(),
            "Pantry dashboard ready"
        ),
        Err(e) => tracing::warn!(error = %e, "Pantry dashboard failed to load"),
    }

    manager.unmount();
    pantry.unmount();
}
