// ============================================================================
// encodehls-core/src/external/sidecar.rs
// ============================================================================
//
// SIDECAR INVOKER: Process-Spawning Transcode Adapter
//
// Runs one rendition through a real ffmpeg process using ffmpeg-sidecar. The
// process's event stream is consumed on the calling thread: progress events
// become ProgressUpdates, log and error lines are routed through
// FfmpegProgressHandler, and the cancellation token is checked on every event
// so a termination request kills the child instead of orphaning it.

// ---- Internal crate imports ----
use super::ffmpeg::{build_hls_command, describe_command};
use super::progress::FfmpegProgressHandler;
use super::{ProgressUpdate, TranscodeInvoker, TranscodeRequest, resolve_ffmpeg_executable};
use crate::cancellation::CancellationToken;
use crate::config::CoreConfig;
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};

// ---- External crate imports ----
use ffmpeg_sidecar::child::FfmpegChild;

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Transcode invoker that spawns ffmpeg for every request.
#[derive(Debug, Clone)]
pub struct SidecarInvoker {
    ffmpeg: PathBuf,
    cancel: CancellationToken,
}

impl SidecarInvoker {
    /// Creates an invoker running the given ffmpeg binary.
    #[must_use]
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates an invoker for the ffmpeg location named in the configuration.
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(resolve_ffmpeg_executable(config.ffmpeg_path.as_deref()))
    }

    /// Kills running encodes once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The ffmpeg binary this invoker runs.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.ffmpeg
    }

    fn stop_child(&self, child: &mut FfmpegChild, variant: &str) {
        log::info!("Stopping ffmpeg for {variant}");
        if let Err(e) = child.kill() {
            log::warn!("Failed to kill ffmpeg for {variant}: {e}");
        }
        if let Err(e) = child.wait() {
            log::warn!("Failed to reap ffmpeg for {variant}: {e}");
        }
    }
}

impl TranscodeInvoker for SidecarInvoker {
    fn invoke(
        &self,
        request: &TranscodeRequest,
        on_progress: &mut dyn FnMut(ProgressUpdate),
    ) -> CoreResult<Duration> {
        if self.cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        let mut cmd = build_hls_command(&self.ffmpeg, request);
        log::debug!("[{}] ffmpeg command: {}", request.variant, describe_command(&cmd));

        let started = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error(self.ffmpeg.display().to_string(), e))?;

        let events = match child.iter() {
            Ok(events) => events,
            Err(e) => {
                self.stop_child(&mut child, &request.variant);
                return Err(command_start_error(
                    self.ffmpeg.display().to_string(),
                    io::Error::other(e.to_string()),
                ));
            }
        };

        let mut handler = FfmpegProgressHandler::new(request.variant.clone());
        for event in events {
            if self.cancel.is_cancelled() {
                self.stop_child(&mut child, &request.variant);
                return Err(CoreError::Cancelled);
            }
            if let Some(update) = handler.handle_event(&event) {
                on_progress(update);
            }
        }

        let status = child
            .wait()
            .map_err(|e| command_wait_error(self.ffmpeg.display().to_string(), e))?;

        if self.cancel.is_cancelled() && !status.success() {
            return Err(CoreError::Cancelled);
        }
        if !status.success() {
            let stderr = handler.stderr_summary();
            log::error!(
                "ffmpeg failed for {} with status {}: {}",
                request.variant,
                status,
                stderr
            );
            return Err(command_failed_error("ffmpeg", status, stderr));
        }

        Ok(started.elapsed())
    }
}
