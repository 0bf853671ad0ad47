#[cfg(feature = "storage-local")]
use crate::FilesystemStore;
#[cfg(feature = "storage-objectstore")]
use crate::ObjectStoreAssets;
use crate::{AssetStore, InlineStore, StorageResult};
#[cfg(not(all(feature = "storage-local", feature = "storage-objectstore")))]
use crate::StorageError;
use reelvault_core::{Config, StorageBackendConfig};
use std::sync::Arc;

/// Create the asset store selected by configuration
pub async fn create_asset_store(config: &Config) -> StorageResult<Arc<dyn AssetStore>> {
    let store: Arc<dyn AssetStore> = match &config.storage {
        StorageBackendConfig::Inline { max_bytes } => Arc::new(InlineStore::new(*max_bytes)),

        #[cfg(feature = "storage-local")]
        StorageBackendConfig::Filesystem {
            assets_root,
            base_url,
        } => Arc::new(FilesystemStore::new(assets_root.clone(), base_url.clone()).await?),

        #[cfg(not(feature = "storage-local"))]
        StorageBackendConfig::Filesystem { .. } => {
            return Err(StorageError::ConfigError(
                "Filesystem storage backend not available (storage-local feature not enabled)"
                    .to_string(),
            ))
        }

        #[cfg(feature = "storage-objectstore")]
        StorageBackendConfig::ObjectStore(os) => Arc::new(ObjectStoreAssets::new(os)?),

        #[cfg(not(feature = "storage-objectstore"))]
        StorageBackendConfig::ObjectStore(_) => {
            return Err(StorageError::ConfigError(
                "Object store backend not available (storage-objectstore feature not enabled)"
                    .to_string(),
            ))
        }
    };

    tracing::info!(
        backend = %store.backend_type(),
        "Asset store initialized"
    );

    Ok(store)
}
