//! Application setup and initialization

pub mod database;
pub mod queue;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use meeting_core::Config;
use meeting_db::MeetingRepository;
use meeting_infra::TelemetryConfig;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    meeting_infra::init_telemetry(&TelemetryConfig::new(
        "meeting-api",
        config.environment(),
        config.log_json(),
    ))
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        storage_driver = %config.storage_driver(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let (storage, url_signer) = storage::setup_storage(&config).await?;
    let queue = queue::setup_queue(&config)?;

    let state = Arc::new(AppState::new(
        config.clone(),
        storage,
        url_signer,
        Arc::new(MeetingRepository::new(pool)),
        queue,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
