//! In-process stand-ins for the media tools, plus a store wrapper that counts saves.

use async_trait::async_trait;
use reelvault_core::StorageBackend;
use reelvault_processing::{
    FastStartTransform, IngestResult, MediaClassification, MediaProbe,
};
use reelvault_storage::{AssetReader, AssetReference, AssetStore, StorageResult};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

pub struct FakeProbe {
    width: u64,
    height: u64,
}

impl FakeProbe {
    pub fn new(width: u64, height: u64) -> Self {
        FakeProbe { width, height }
    }
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe(&self, _path: &Path) -> IngestResult<MediaClassification> {
        Ok(MediaClassification::classify(self.width, self.height))
    }
}

/// Stream copy stand-in: output bytes equal input bytes.
pub struct FakeRemux;

#[async_trait]
impl FastStartTransform for FakeRemux {
    async fn remux(&self, input: &Path, output: &Path) -> IngestResult<()> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

pub struct CountingStore {
    inner: Arc<dyn AssetStore>,
    saves: AtomicUsize,
    /// When set, every video row is deleted once a save has succeeded
    purge_videos_after_save: OnceLock<SqlitePool>,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn AssetStore>) -> Self {
        CountingStore {
            inner,
            saves: AtomicUsize::new(0),
            purge_videos_after_save: OnceLock::new(),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Remove the video records between the pipeline's save and the handler's update.
    pub fn purge_videos_after_save(&self, pool: SqlitePool) {
        let _ = self.purge_videos_after_save.set(pool);
    }
}

#[async_trait]
impl AssetStore for CountingStore {
    async fn save(
        &self,
        key: &str,
        media_type: &str,
        reader: AssetReader,
    ) -> StorageResult<AssetReference> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let reference = self.inner.save(key, media_type, reader).await?;
        if let Some(pool) = self.purge_videos_after_save.get() {
            sqlx::query("DELETE FROM videos")
                .execute(pool)
                .await
                .expect("Failed to purge videos");
        }
        Ok(reference)
    }

    async fn resolve_url(&self, reference: &str) -> StorageResult<String> {
        self.inner.resolve_url(reference).await
    }

    async fn fetch(&self, reference: &str) -> StorageResult<Vec<u8>> {
        self.inner.fetch(reference).await
    }

    fn max_asset_bytes(&self) -> Option<u64> {
        self.inner.max_asset_bytes()
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
