use crate::traits::{AssetReader, AssetStore, StorageError, StorageResult};
use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use http::Method;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt};
use reelvault_core::{ObjectStoreConfig, UrlPolicyConfig};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// S3-compatible object store implementation
///
/// Uploads are streamed with a multipart `BufWriter`, so memory use stays bounded by the
/// part size regardless of asset length. The reference URL is derived from the active
/// [`UrlPolicyConfig`].
#[derive(Clone)]
pub struct ObjectStoreAssets {
    store: Arc<dyn ObjectStore>,
    signer: Option<Arc<dyn Signer>>,
    bucket: String,
    region: String,
    policy: UrlPolicyConfig,
}

impl ObjectStoreAssets {
    /// Build an AmazonS3 client from the environment (credentials) plus explicit settings.
    ///
    /// The localstack policy also points the client at the emulator endpoint.
    pub fn new(config: &ObjectStoreConfig) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone());

        if let Some(endpoint) = config.endpoint() {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.to_string())
                .with_allow_http(allow_http)
                .with_virtual_hosted_style_request(false);
        }

        let s3 = Arc::new(
            builder
                .build()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?,
        );
        let store: Arc<dyn ObjectStore> = s3.clone();
        let signer: Arc<dyn Signer> = s3;

        Ok(Self::with_store(store, Some(signer), config))
    }

    /// Wrap an existing store. `signer` is required only by the presigned policy.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        signer: Option<Arc<dyn Signer>>,
        config: &ObjectStoreConfig,
    ) -> Self {
        ObjectStoreAssets {
            store,
            signer,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            policy: config.policy.clone(),
        }
    }

    /// URL prefix that, followed by the key, addresses an object under the active policy.
    fn url_prefix(&self) -> Option<String> {
        match &self.policy {
            UrlPolicyConfig::Public => Some(format!(
                "https://{}.s3.{}.amazonaws.com/",
                self.bucket, self.region
            )),
            UrlPolicyConfig::Localstack { base_url } => {
                Some(format!("{}/{}/", base_url, self.bucket))
            }
            UrlPolicyConfig::Cloudfront { host } => Some(format!("https://{}/", host)),
            UrlPolicyConfig::Presigned { .. } => None,
        }
    }

    fn reference_for(&self, key: &str) -> AssetReference {
        match self.url_prefix() {
            Some(prefix) => AssetReference::Url(format!("{}{}", prefix, key)),
            None => AssetReference::ObjectKey {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            },
        }
    }

    fn key_from_reference<'a>(&self, reference: &'a str) -> StorageResult<&'a str> {
        let key = match self.url_prefix() {
            Some(prefix) => reference.strip_prefix(prefix.as_str()),
            None => AssetReference::parse_object_key(reference)
                .filter(|(bucket, _)| *bucket == self.bucket)
                .map(|(_, key)| key),
        };
        key.ok_or_else(|| {
            StorageError::InvalidReference(format!(
                "{} does not address bucket {} under the {} policy",
                reference,
                self.bucket,
                self.policy.policy()
            ))
        })
    }

    async fn presign(&self, key: &str) -> StorageResult<String> {
        let UrlPolicyConfig::Presigned { expires_in } = &self.policy else {
            return Err(StorageError::ConfigError(
                "presigning requires the presigned URL policy".to_string(),
            ));
        };
        let signer = self.signer.as_ref().ok_or_else(|| {
            StorageError::ConfigError("object store has no URL signer".to_string())
        })?;

        let location = Path::from(key);
        let url = signer
            .signed_url(Method::GET, &location, *expires_in)
            .await
            .map_err(|e| StorageError::ConfigError(format!("Failed to presign URL: {}", e)))?;

        Ok(url.to_string())
    }
}

#[async_trait]
impl AssetStore for ObjectStoreAssets {
    async fn save(
        &self,
        key: &str,
        media_type: &str,
        mut reader: AssetReader,
    ) -> StorageResult<AssetReference> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let location = Path::from(key);
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, media_type.to_string().into());
        let mut writer =
            BufWriter::new(Arc::clone(&self.store), location).with_attributes(attributes);

        let copied = tokio::io::copy(&mut reader, &mut writer).await;
        let result = match copied {
            Ok(size) => writer.shutdown().await.map(|_| size),
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        bucket = %self.bucket,
                        key = %key,
                        "Failed to abort multipart upload"
                    );
                }
                Err(e)
            }
        };

        let size = result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            policy = %self.policy.policy(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.reference_for(key))
    }

    async fn resolve_url(&self, reference: &str) -> StorageResult<String> {
        match &self.policy {
            UrlPolicyConfig::Presigned { .. } => {
                let key = self.key_from_reference(reference)?;
                self.presign(key).await
            }
            _ => Ok(reference.to_string()),
        }
    }

    async fn fetch(&self, reference: &str) -> StorageResult<Vec<u8>> {
        let key = self.key_from_reference(reference)?;
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let result = self.store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::ObjectStore
    }
}
