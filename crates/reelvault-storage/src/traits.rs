//! Storage abstraction trait
//!
//! This module defines the AssetStore trait that all storage backends must implement.

use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid asset reference: {0}")]
    InvalidReference(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Owned, sequential byte source handed to [`AssetStore::save`].
pub type AssetReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Asset persistence capability
///
/// One implementation is selected at startup and shared by every request. Implementations
/// consume the reader to EOF, never retry, and return the reference that is persisted in
/// the metadata record.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist the bytes from `reader` under `key` and return the durable reference.
    ///
    /// `key` is produced by [`crate::RandomNamer`]; the inline backend ignores it.
    async fn save(
        &self,
        key: &str,
        media_type: &str,
        reader: AssetReader,
    ) -> StorageResult<AssetReference>;

    /// Turn a stored reference into a URL a client can use right now.
    ///
    /// Identity for every backend except the presigned object-store policy, which signs a
    /// fresh URL on each call.
    async fn resolve_url(&self, reference: &str) -> StorageResult<String>;

    /// Read back the bytes behind a stored reference.
    async fn fetch(&self, reference: &str) -> StorageResult<Vec<u8>>;

    /// Upper bound on asset size this backend accepts, if it has one.
    fn max_asset_bytes(&self) -> Option<u64> {
        None
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
