//! Application setup and initialization
//!
//! Startup order: telemetry, database, asset store, ingestion pipeline, routes. Any
//! failure aborts startup before the listener is bound.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use reelvault_core::Config;
use reelvault_processing::IngestionPipeline;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        platform = %config.platform,
        backend = %config.storage.backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let store = storage::setup_storage(&config).await?;

    let pipeline = IngestionPipeline::from_config(&config, store).with_context(|| {
        format!(
            "Failed to prepare staging directory {}",
            config.staging_dir.display()
        )
    })?;

    let state = Arc::new(AppState::new(config, pool, pipeline));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
