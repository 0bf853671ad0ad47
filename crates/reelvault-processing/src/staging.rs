//! Request-scoped scratch files.
//!
//! Every [`StagedFile`] owns a `NamedTempFile`, so the backing file is removed when the
//! handle is released or dropped, including on early returns, cancellation and unwinding.

use crate::error::IngestResult;
use crate::validator::ValidationError;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

const SCRATCH_PREFIX: &str = "reelvault-";

/// Private directory holding in-flight scratch files.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(StagingArea { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy at most `max_bytes` from `reader` into a new scratch file.
    ///
    /// Reading stops at `max_bytes + 1`; a stream longer than `max_bytes` fails with
    /// `PayloadTooLarge` without being drained.
    pub async fn stage<R>(&self, reader: R, max_bytes: u64) -> IngestResult<StagedFile>
    where
        R: AsyncRead + Unpin,
    {
        let start = std::time::Instant::now();
        let temp = self.allocate_temp("upload")?;
        let mut out = tokio::fs::File::from_std(temp.reopen()?);

        let mut bounded = reader.take(max_bytes.saturating_add(1));
        let copied = tokio::io::copy(&mut bounded, &mut out).await?;
        if copied > max_bytes {
            tracing::debug!(
                max_bytes,
                "Upload exceeded staging ceiling"
            );
            return Err(ValidationError::PayloadTooLarge { max: max_bytes }.into());
        }

        out.flush().await?;
        out.sync_all().await?;

        tracing::debug!(
            path = %temp.path().display(),
            size_bytes = copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(StagedFile {
            file: temp,
            len: copied,
        })
    }

    /// Empty scratch file for tool output, e.g. a remuxed container.
    pub fn allocate(&self, label: &str, suffix: &str) -> io::Result<StagedFile> {
        let file = tempfile::Builder::new()
            .prefix(&format!("{}{}-", SCRATCH_PREFIX, label))
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        Ok(StagedFile { file, len: 0 })
    }

    fn allocate_temp(&self, label: &str) -> io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&format!("{}{}-", SCRATCH_PREFIX, label))
            .tempfile_in(&self.dir)
    }
}

/// Scratch copy of one upload, owned by exactly one pipeline run.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    len: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Re-read the on-disk length after an external tool wrote to the file.
    pub async fn refresh_len(&mut self) -> io::Result<u64> {
        self.len = tokio::fs::metadata(self.file.path()).await?.len();
        Ok(self.len)
    }

    /// Independent read handle positioned at the start of the file.
    pub async fn reader(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(self.file.path()).await
    }

    /// Delete the backing file now and surface any error.
    pub fn release(self) -> io::Result<()> {
        self.file.close()
    }
}
