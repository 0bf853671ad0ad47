use crate::error::{IngestError, IngestResult};
use crate::tool::run_tool;
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

const RATIO_TOLERANCE: f64 = 0.01;

/// Aspect-ratio class of a video, used only to choose a storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClassification {
    Landscape,
    Portrait,
    Other,
}

impl MediaClassification {
    /// Classify by width/height ratio: 16:9 and 9:16 within ±0.01, everything else `Other`.
    pub fn classify(width: u64, height: u64) -> Self {
        let ratio = width as f64 / height as f64;
        if (ratio - 16.0 / 9.0).abs() <= RATIO_TOLERANCE {
            MediaClassification::Landscape
        } else if (ratio - 9.0 / 16.0).abs() <= RATIO_TOLERANCE {
            MediaClassification::Portrait
        } else {
            MediaClassification::Other
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            MediaClassification::Landscape => "landscape",
            MediaClassification::Portrait => "portrait",
            MediaClassification::Other => "other",
        }
    }
}

/// Media inspection capability
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> IngestResult<MediaClassification>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: u64,
    #[serde(default)]
    height: u64,
}

/// Extract the first stream's dimensions from ffprobe JSON output.
pub fn parse_probe_output(stdout: &[u8]) -> IngestResult<(u64, u64)> {
    let parsed: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| IngestError::ToolFailure {
            tool: "ffprobe",
            detail: format!("unparseable output: {}", e),
        })?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| IngestError::UnprobeableMedia("no video stream reported".to_string()))?;

    if stream.width == 0 || stream.height == 0 {
        return Err(IngestError::UnprobeableMedia(format!(
            "stream reports {}x{}",
            stream.width, stream.height
        )));
    }

    Ok((stream.width, stream.height))
}

/// ffprobe-backed [`MediaProbe`]
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
    timeout: Option<Duration>,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Option<Duration>) -> Self {
        FfprobeProbe {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
    ))]
    async fn probe(&self, path: &Path) -> IngestResult<MediaClassification> {
        let output = run_tool(
            "ffprobe",
            &self.ffprobe_path,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_streams"),
                OsStr::new("-select_streams"),
                OsStr::new("v:0"),
                path.as_os_str(),
            ],
            self.timeout,
        )
        .await?;

        let (width, height) = parse_probe_output(&output.stdout)?;
        let classification = MediaClassification::classify(width, height);

        tracing::info!(
            width,
            height,
            classification = classification.prefix(),
            "Video probe completed"
        );

        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_common_resolutions() {
        assert_eq!(MediaClassification::classify(1920, 1080), MediaClassification::Landscape);
        assert_eq!(MediaClassification::classify(1280, 720), MediaClassification::Landscape);
        assert_eq!(MediaClassification::classify(1080, 1920), MediaClassification::Portrait);
        assert_eq!(MediaClassification::classify(720, 1280), MediaClassification::Portrait);
        assert_eq!(MediaClassification::classify(640, 480), MediaClassification::Other);
        assert_eq!(MediaClassification::classify(1080, 1080), MediaClassification::Other);
    }

    #[test]
    fn test_classify_tolerance_edges() {
        // 854x480 = 1.7792, within 0.01 of 1.7778
        assert_eq!(MediaClassification::classify(854, 480), MediaClassification::Landscape);
        // 1.80 is outside the tolerance
        assert_eq!(MediaClassification::classify(180, 100), MediaClassification::Other);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let first = MediaClassification::classify(1918, 1080);
        for _ in 0..10 {
            assert_eq!(MediaClassification::classify(1918, 1080), first);
        }
    }

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}"#;
        assert_eq!(parse_probe_output(json).unwrap(), (1920, 1080));
    }

    #[test]
    fn test_parse_probe_output_failures() {
        assert!(matches!(
            parse_probe_output(br#"{"streams":[]}"#),
            Err(IngestError::UnprobeableMedia(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{}"#),
            Err(IngestError::UnprobeableMedia(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{"streams":[{"width":0,"height":1080}]}"#),
            Err(IngestError::UnprobeableMedia(_))
        ));
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(IngestError::ToolFailure { tool: "ffprobe", .. })
        ));
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use crate::test_support::fake_tool;
        use tempfile::tempdir;

        #[tokio::test]
        async fn test_probe_with_fake_ffprobe() {
            let dir = tempdir().unwrap();
            let tool = fake_tool(
                dir.path(),
                "ffprobe",
                r#"echo '{"streams":[{"width":1080,"height":1920}]}'"#,
            );

            let probe = FfprobeProbe::new(tool.to_string_lossy(), None);
            let classification = probe.probe(&dir.path().join("in.mp4")).await.unwrap();
            assert_eq!(classification, MediaClassification::Portrait);
        }

        #[tokio::test]
        async fn test_probe_non_zero_exit_is_tool_failure() {
            let dir = tempdir().unwrap();
            let tool = fake_tool(dir.path(), "ffprobe", "echo 'moov atom not found' >&2; exit 1");

            let probe = FfprobeProbe::new(tool.to_string_lossy(), None);
            let result = probe.probe(&dir.path().join("in.mp4")).await;
            match result {
                Err(IngestError::ToolFailure { tool, detail }) => {
                    assert_eq!(tool, "ffprobe");
                    assert!(detail.contains("moov atom not found"));
                }
                other => panic!("Expected ToolFailure, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_probe_timeout_is_tool_failure() {
            let dir = tempdir().unwrap();
            let tool = fake_tool(dir.path(), "ffprobe", "sleep 5");

            let probe = FfprobeProbe::new(tool.to_string_lossy(), Some(Duration::from_millis(200)));
            let start = std::time::Instant::now();
            let result = probe.probe(&dir.path().join("in.mp4")).await;

            assert!(matches!(result, Err(IngestError::ToolFailure { .. })));
            assert!(start.elapsed() < Duration::from_secs(4));
        }

        #[tokio::test]
        async fn test_missing_binary_is_tool_failure() {
            let probe = FfprobeProbe::new("/nonexistent/ffprobe", None);
            let result = probe.probe(Path::new("/tmp/in.mp4")).await;
            assert!(matches!(result, Err(IngestError::ToolFailure { .. })));
        }
    }
}
