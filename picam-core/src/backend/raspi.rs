//! Reference backend: shells out to the platform capture tools.
//!
//! Stills go straight through `raspistill`. Video is a two-step pipeline:
//! `raspivid` records a raw H.264 elementary stream, which is then
//! repackaged into an MP4 container with `MP4Box`. The intermediate
//! stream file is removed afterwards.

use std::path::Path;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::process::Command;

use crate::backend::{args, CaptureBackend};
use crate::config::CameraConfig;
use crate::error::CameraError;

/// Shells out to `raspistill` / `raspivid` / `MP4Box`.
#[derive(Debug, Clone)]
pub struct RaspiBackend {
    still_tool: String,
    video_tool: String,
    mux_tool: String,
}

impl RaspiBackend {
    pub fn new() -> Self {
        Self {
            still_tool: "raspistill".to_string(),
            video_tool: "raspivid".to_string(),
            mux_tool: "MP4Box".to_string(),
        }
    }

    /// Override the tool names, e.g. to point at absolute paths.
    pub fn with_tools(
        still_tool: impl Into<String>,
        video_tool: impl Into<String>,
        mux_tool: impl Into<String>,
    ) -> Self {
        Self {
            still_tool: still_tool.into(),
            video_tool: video_tool.into(),
            mux_tool: mux_tool.into(),
        }
    }
}

impl Default for RaspiBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a tool to completion; anything but a zero exit is a camera failure.
async fn run(mut command: Command) -> Result<(), CameraError> {
    match command.output().await {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            tracing::warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "capture tool failed"
            );
            Err(CameraError::CameraFailed)
        }
        Err(error) => {
            tracing::warn!(%error, "capture tool could not be started");
            Err(CameraError::CameraFailed)
        }
    }
}

impl CaptureBackend for RaspiBackend {
    fn capture_still<'a>(
        &'a self,
        config: &'a CameraConfig,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), CameraError>> {
        Box::pin(async move {
            let mut command = Command::new(&self.still_tool);
            command.args(args::still_args(config)).arg("-o").arg(dest);
            run(command).await
        })
    }

    fn capture_video<'a>(
        &'a self,
        config: &'a CameraConfig,
        duration: Duration,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), CameraError>> {
        Box::pin(async move {
            let raw = dest.with_extension("h264");

            let mut record = Command::new(&self.video_tool);
            record
                .args(args::video_args(config))
                .arg("-t")
                .arg(duration.as_millis().to_string())
                .arg("-o")
                .arg(&raw);

            let recorded = run(record).await;

            let result = match recorded {
                Ok(()) => {
                    let mut mux = Command::new(&self.mux_tool);
                    mux.arg("-add").arg(&raw).arg(dest);
                    run(mux).await
                }
                Err(error) => Err(error),
            };

            let _ = tokio::fs::remove_file(&raw).await;

            result
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────
