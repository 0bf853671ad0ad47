//! Storage setup and initialization

use anyhow::{Context, Result};
use reelvault_core::Config;
use reelvault_storage::{create_asset_store, AssetStore};
use std::sync::Arc;

/// Build the single asset store used for every asset kind for the life of the process.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn AssetStore>> {
    tracing::info!("Initializing asset store...");
    let store = create_asset_store(config)
        .await
        .context("Failed to initialize asset store")?;

    if let Some(max) = store.max_asset_bytes() {
        tracing::info!(
            max_asset_bytes = max,
            "Asset store caps upload size below the configured ceilings"
        );
    }

    Ok(store)
}
