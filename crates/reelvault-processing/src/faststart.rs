use crate::error::{IngestError, IngestResult};
use crate::tool::run_tool;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// Fast-start remux capability
///
/// Writes a copy of `input` to `output` with the container index moved to the front.
/// Both paths are owned by the caller, who also releases them.
#[async_trait]
pub trait FastStartTransform: Send + Sync {
    async fn remux(&self, input: &Path, output: &Path) -> IngestResult<()>;
}

/// ffmpeg-backed [`FastStartTransform`] using stream copy only
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Option<Duration>,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Option<Duration>) -> Self {
        FfmpegRemuxer {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FastStartTransform for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path, output: &Path) -> IngestResult<()> {
        let start = std::time::Instant::now();

        // -y: the output scratch file already exists (empty)
        run_tool(
            "ffmpeg",
            &self.ffmpeg_path,
            [
                OsStr::new("-y"),
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-movflags"),
                OsStr::new("faststart"),
                OsStr::new("-codec"),
                OsStr::new("copy"),
                OsStr::new("-f"),
                OsStr::new("mp4"),
                output.as_os_str(),
            ],
            self.timeout,
        )
        .await?;

        let size = tokio::fs::metadata(output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if size == 0 {
            return Err(IngestError::EmptyOutput { tool: "ffmpeg" });
        }

        tracing::info!(
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux completed"
        );

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::fake_tool;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_remux_copies_into_output() {
        let dir = tempdir().unwrap();
        // $5 is the input path, ${12} the output path
        let tool = fake_tool(dir.path(), "ffmpeg", r#"cat "$5" > "${12}""#);
        let input = dir.path().join("in.mp4");
        let output = dir.path().join("out.mp4");
        std::fs::write(&input, b"ftypisom....moov").unwrap();

        FfmpegRemuxer::new(tool.to_string_lossy(), None)
            .remux(&input, &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"ftypisom....moov");
    }

    #[tokio::test]
    async fn test_empty_output_rejected() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), "ffmpeg", r#": > "${12}""#);
        let input = dir.path().join("in.mp4");
        let output = dir.path().join("out.mp4");
        std::fs::write(&input, b"data").unwrap();

        let result = FfmpegRemuxer::new(tool.to_string_lossy(), None)
            .remux(&input, &output)
            .await;
        assert!(matches!(result, Err(IngestError::EmptyOutput { tool: "ffmpeg" })));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), "ffmpeg", "echo 'Invalid data found' >&2; exit 69");

        let result = FfmpegRemuxer::new(tool.to_string_lossy(), None)
            .remux(&dir.path().join("in.mp4"), &dir.path().join("out.mp4"))
            .await;
        match result {
            Err(IngestError::ToolFailure { tool, detail }) => {
                assert_eq!(tool, "ffmpeg");
                assert!(detail.contains("Invalid data found"));
            }
            other => panic!("Expected ToolFailure, got {:?}", other),
        }
    }
}
