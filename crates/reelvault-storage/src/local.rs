use crate::traits::{AssetReader, AssetStore, StorageError, StorageResult};
use crate::{AssetReference, StorageBackend};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct FilesystemStore {
    base_path: PathBuf,
    base_url: String,
}

impl FilesystemStore {
    /// Create a new FilesystemStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for asset files (e.g., "./assets")
    /// * `base_url` - Base URL the root is served under (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(FilesystemStore {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert storage key to filesystem path, rejecting keys that could escape the root.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Recover the storage key from a URL previously returned by this store.
    fn key_from_reference<'a>(&self, reference: &'a str) -> StorageResult<&'a str> {
        reference
            .strip_prefix(self.base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                StorageError::InvalidReference(format!(
                    "{} is not served from {}",
                    reference, self.base_url
                ))
            })
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_stream(path: &Path, mut reader: AssetReader) -> StorageResult<u64> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(bytes_copied)
    }
}

#[async_trait]
impl AssetStore for FilesystemStore {
    async fn save(
        &self,
        key: &str,
        _media_type: &str,
        reader: AssetReader,
    ) -> StorageResult<AssetReference> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let bytes_copied = match Self::write_stream(&path, reader).await {
            Ok(n) => n,
            Err(e) => {
                // Partial files must not outlive a failed save.
                if let Err(cleanup) = fs::remove_file(&path).await {
                    tracing::warn!(
                        error = %cleanup,
                        path = %path.display(),
                        "Failed to remove partial asset file"
                    );
                }
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream upload failed"
                );
                return Err(e);
            }
        };

        let url = self.generate_url(key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(AssetReference::Url(url))
    }

    async fn resolve_url(&self, reference: &str) -> StorageResult<String> {
        Ok(reference.to_string())
    }

    async fn fetch(&self, reference: &str) -> StorageResult<Vec<u8>> {
        let key = self.key_from_reference(reference)?;
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Filesystem
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::tempdir;
    use tokio::io::{AsyncRead, ReadBuf};

    const BASE_URL: &str = "http://localhost:8091/assets";

    /// Yields some bytes, then fails.
    struct FailingReader {
        sent: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(std::io::Error::other("connection reset")));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_filesystem_round_trip() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path(), format!("{}/", BASE_URL))
            .await
            .unwrap();
        let data = b"\x89PNG\r\n\x1a\nfake image body".to_vec();

        let reference = store
            .save("abc.png", "image/png", Box::pin(Cursor::new(data.clone())))
            .await
            .unwrap();

        let url = reference.to_string();
        assert_eq!(url, "http://localhost:8091/assets/abc.png");
        assert_eq!(std::fs::read(dir.path().join("abc.png")).unwrap(), data);
        assert_eq!(store.fetch(&url).await.unwrap(), data);
        assert_eq!(store.resolve_url(&url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_nested_key_creates_directories() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path(), BASE_URL.to_string())
            .await
            .unwrap();

        store
            .save("portrait/xyz.mp4", "video/mp4", Box::pin(Cursor::new(b"mp4".to_vec())))
            .await
            .unwrap();

        assert!(dir.path().join("portrait").join("xyz.mp4").exists());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path(), BASE_URL.to_string())
            .await
            .unwrap();

        for key in ["../escape.png", "/etc/passwd", "a/../../b.png", ""] {
            let result = store
                .save(key, "image/png", Box::pin(Cursor::new(b"x".to_vec())))
                .await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{key}");
        }

        let result = store
            .fetch("http://localhost:8091/assets/../../etc/passwd")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path(), BASE_URL.to_string())
            .await
            .unwrap();

        let result = store
            .save("broken.png", "image/png", Box::pin(FailingReader { sent: false }))
            .await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!dir.path().join("broken.png").exists());
    }

    #[tokio::test]
    async fn test_fetch_foreign_reference() {
        let dir = tempdir().unwrap();
        let store = FilesystemStore::new(dir.path(), BASE_URL.to_string())
            .await
            .unwrap();

        let result = store.fetch("https://elsewhere.example.com/abc.png").await;
        assert!(matches!(result, Err(StorageError::InvalidReference(_))));

        let result = store.fetch("http://localhost:8091/assets/missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
