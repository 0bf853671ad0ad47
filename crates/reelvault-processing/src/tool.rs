//! Subprocess invocation shared by the probe and the remuxer.

use crate::error::{IngestError, IngestResult};
use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Run `program` to completion and return its output.
///
/// The child is killed when the returned future is dropped, so a cancelled request or an
/// expired timeout never leaves a tool running.
pub(crate) async fn run_tool<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
    timeout: Option<Duration>,
) -> IngestResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start = std::time::Instant::now();

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| IngestError::ToolFailure {
            tool,
            detail: format!("failed to execute {}: {}", program, e),
        })?;

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| IngestError::ToolFailure {
                tool,
                detail: format!("timed out after {}s", limit.as_secs_f64()),
            })?,
        None => child.wait_with_output().await,
    }
    .map_err(|e| IngestError::ToolFailure {
        tool,
        detail: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(
            tool,
            status = %output.status,
            stderr = %stderr.trim(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media tool exited unsuccessfully"
        );
        return Err(IngestError::ToolFailure {
            tool,
            detail: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }

    tracing::debug!(
        tool,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Media tool completed"
    );

    Ok(output)
}
