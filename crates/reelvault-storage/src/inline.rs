use crate::traits::{AssetReader, AssetStore, StorageError, StorageResult};
use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::io::AsyncReadExt;

/// Inline storage implementation
///
/// Embeds the asset bytes in a `data:{media_type};base64,...` URL. The metadata record
/// holds the bytes itself, so there is nothing to clean up and nothing shared in memory.
#[derive(Clone, Debug)]
pub struct InlineStore {
    max_bytes: u64,
}

impl InlineStore {
    pub fn new(max_bytes: u64) -> Self {
        InlineStore { max_bytes }
    }

    fn decode(reference: &str) -> StorageResult<Vec<u8>> {
        let payload = reference
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| StorageError::InvalidReference("not a base64 data URL".to_string()))?;

        STANDARD
            .decode(payload)
            .map_err(|e| StorageError::InvalidReference(format!("invalid base64 payload: {}", e)))
    }
}

#[async_trait]
impl AssetStore for InlineStore {
    async fn save(
        &self,
        _key: &str,
        media_type: &str,
        reader: AssetReader,
    ) -> StorageResult<AssetReference> {
        let start = std::time::Instant::now();

        // One extra byte distinguishes "exactly at the limit" from "over it".
        let mut data = Vec::new();
        reader
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut data)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read asset: {}", e)))?;

        if data.len() as u64 > self.max_bytes {
            return Err(StorageError::UploadFailed(format!(
                "inline assets are limited to {} bytes",
                self.max_bytes
            )));
        }

        let url = format!("data:{};base64,{}", media_type, STANDARD.encode(&data));

        tracing::info!(
            media_type = %media_type,
            size_bytes = data.len(),
            encoded_bytes = url.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Inline asset encoded"
        );

        Ok(AssetReference::Url(url))
    }

    async fn resolve_url(&self, reference: &str) -> StorageResult<String> {
        Ok(reference.to_string())
    }

    async fn fetch(&self, reference: &str) -> StorageResult<Vec<u8>> {
        Self::decode(reference)
    }

    fn max_asset_bytes(&self) -> Option<u64> {
        Some(self.max_bytes)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Inline
    }
}
