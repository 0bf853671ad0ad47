//! Ingestion pipeline: validate → stage → probe → remux → store.
//!
//! Staged files are request-scoped. Each step that fails returns early, and the
//! `StagedFile` handles created so far are dropped, which deletes their backing files.

use std::io;
use std::sync::Arc;

use reelvault_core::constants::{MAX_THUMBNAIL_SIZE_BYTES, MAX_VIDEO_SIZE_BYTES};
use reelvault_core::Config;
use reelvault_storage::{AssetReference, AssetStore, RandomNamer};
use tokio::io::AsyncRead;

use crate::error::{IngestError, IngestResult};
use crate::faststart::{FastStartTransform, FfmpegRemuxer};
use crate::probe::{FfprobeProbe, MediaProbe};
use crate::staging::{StagedFile, StagingArea};
use crate::validator::{AssetKind, ValidationError};

/// Per-kind upload ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestLimits {
    pub max_thumbnail_bytes: u64,
    pub max_video_bytes: u64,
}

impl Default for IngestLimits {
    fn default() -> Self {
        IngestLimits {
            max_thumbnail_bytes: MAX_THUMBNAIL_SIZE_BYTES,
            max_video_bytes: MAX_VIDEO_SIZE_BYTES,
        }
    }
}

impl IngestLimits {
    pub fn from_config(config: &Config) -> Self {
        IngestLimits {
            max_thumbnail_bytes: config.max_thumbnail_size_bytes,
            max_video_bytes: config.max_video_size_bytes,
        }
    }
}

pub struct IngestionPipeline {
    staging: StagingArea,
    probe: Arc<dyn MediaProbe>,
    remux: Arc<dyn FastStartTransform>,
    store: Arc<dyn AssetStore>,
    namer: RandomNamer,
    limits: IngestLimits,
}

impl IngestionPipeline {
    pub fn new(
        staging: StagingArea,
        probe: Arc<dyn MediaProbe>,
        remux: Arc<dyn FastStartTransform>,
        store: Arc<dyn AssetStore>,
        limits: IngestLimits,
    ) -> Self {
        IngestionPipeline {
            staging,
            probe,
            remux,
            store,
            namer: RandomNamer,
            limits,
        }
    }

    /// Wire the ffprobe/ffmpeg-backed pipeline from configuration.
    pub fn from_config(config: &Config, store: Arc<dyn AssetStore>) -> io::Result<Self> {
        let timeout = config.media_tool_timeout();
        Ok(Self::new(
            StagingArea::new(&config.staging_dir)?,
            Arc::new(FfprobeProbe::new(config.ffprobe_path.clone(), timeout)),
            Arc::new(FfmpegRemuxer::new(config.ffmpeg_path.clone(), timeout)),
            store,
            IngestLimits::from_config(config),
        ))
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Effective ceiling for `kind`: the configured limit, capped by the backend's own.
    pub fn ceiling(&self, kind: AssetKind) -> u64 {
        let limit = match kind {
            AssetKind::Thumbnail => self.limits.max_thumbnail_bytes,
            AssetKind::Video => self.limits.max_video_bytes,
        };
        match self.store.max_asset_bytes() {
            Some(backend_max) => limit.min(backend_max),
            None => limit,
        }
    }

    pub async fn ingest<R>(
        &self,
        kind: AssetKind,
        declared_media_type: Option<&str>,
        reader: R,
    ) -> IngestResult<AssetReference>
    where
        R: AsyncRead + Unpin + Send,
    {
        match kind {
            AssetKind::Thumbnail => self.ingest_thumbnail(declared_media_type, reader).await,
            AssetKind::Video => self.ingest_video(declared_media_type, reader).await,
        }
    }

    #[tracing::instrument(skip(self, reader), fields(asset.kind = "thumbnail"))]
    pub async fn ingest_thumbnail<R>(
        &self,
        declared_media_type: Option<&str>,
        reader: R,
    ) -> IngestResult<AssetReference>
    where
        R: AsyncRead + Unpin + Send,
    {
        let media_type = AssetKind::Thumbnail.validate_media_type(declared_media_type)?;
        let staged = self
            .staging
            .stage(reader, self.ceiling(AssetKind::Thumbnail))
            .await?;
        if staged.is_empty() {
            return Err(ValidationError::EmptyPayload.into());
        }

        let key = self.namer.key(&media_type, None);
        let reference = self.save(&key, &media_type, &staged).await?;
        release(staged);

        Ok(reference)
    }

    #[tracing::instrument(skip(self, reader), fields(asset.kind = "video"))]
    pub async fn ingest_video<R>(
        &self,
        declared_media_type: Option<&str>,
        reader: R,
    ) -> IngestResult<AssetReference>
    where
        R: AsyncRead + Unpin + Send,
    {
        let media_type = AssetKind::Video.validate_media_type(declared_media_type)?;
        let staged = self
            .staging
            .stage(reader, self.ceiling(AssetKind::Video))
            .await?;
        if staged.is_empty() {
            return Err(ValidationError::EmptyPayload.into());
        }

        let classification = self.probe.probe(staged.path()).await?;

        let mut remuxed = self.staging.allocate("faststart", ".mp4")?;
        self.remux.remux(staged.path(), remuxed.path()).await?;
        release(staged);

        if remuxed.refresh_len().await? == 0 {
            return Err(IngestError::EmptyOutput { tool: "ffmpeg" });
        }

        let key = self.namer.key(&media_type, Some(classification.prefix()));
        let reference = self.save(&key, &media_type, &remuxed).await?;
        release(remuxed);

        Ok(reference)
    }

    async fn save(
        &self,
        key: &str,
        media_type: &str,
        staged: &StagedFile,
    ) -> IngestResult<AssetReference> {
        let reader = staged.reader().await?;
        let reference = self.store.save(key, media_type, Box::pin(reader)).await?;

        tracing::info!(
            key = %key,
            media_type = %media_type,
            size_bytes = staged.len(),
            backend = %self.store.backend_type(),
            "Asset stored"
        );

        Ok(reference)
    }
}

fn release(file: StagedFile) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.release() {
        tracing::warn!(error = %e, path = %path.display(), "Failed to release staged file");
    }
}
