// ============================================================================
// encodehls-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: The Transcode Invoker Seam
//
// This module encapsulates every interaction with the external encoder. The
// orchestrator and job runner only see the TranscodeInvoker trait; the real
// adapter spawns ffmpeg through ffmpeg-sidecar and an in-memory adapter
// stands in for it in tests.
//
// KEY COMPONENTS:
// - TranscodeInvoker: trait for running one input through one rendition
// - TranscodeRequest: the fully materialized parameter set for one invocation
// - ProgressUpdate: processed/total duration pairs reported during a run
// - Dependency checking and ffmpeg executable resolution

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

// ============================================================================
// SUBMODULES
// ============================================================================

/// ffmpeg argument building for HLS renditions
pub mod ffmpeg;

/// Translation of ffmpeg events into progress updates and diagnostics
pub mod progress;

/// Process-spawning invoker backed by ffmpeg-sidecar
pub mod sidecar;

/// Scripted in-memory invoker for deterministic tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::build_hls_command;
pub use sidecar::SidecarInvoker;

// ============================================================================
// INVOCATION CONTRACT
// ============================================================================

/// Everything the external encoder needs to produce one HLS rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    /// Profile name, used for diagnostics only
    pub variant: String,
    pub input_path: PathBuf,
    /// Variant playlist the encoder writes
    pub playlist_path: PathBuf,
    /// Segment filename template with a zero-padded sequence number
    pub segment_pattern: PathBuf,
    /// Video bitrate in bits per second
    pub video_bitrate: u64,
    /// Audio bitrate in bits per second
    pub audio_bitrate: u64,
    /// Output dimensions; `None` keeps the source size
    pub dimensions: Option<(u32, u32)>,
    pub video_codec: String,
    pub audio_codec: String,
    pub segment_duration_secs: u32,
    /// Maximum playlist entries; 0 means unbounded
    pub playlist_size: u32,
}

/// Progress reported by an invoker while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Media time processed so far
    pub processed: Duration,
    /// Total media duration of the input
    pub total: Duration,
}

impl ProgressUpdate {
    #[must_use]
    pub fn new(processed: Duration, total: Duration) -> Self {
        Self { processed, total }
    }

    /// `floor(100 * processed / total)`, clamped to 0..=100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        percent_complete(self.processed, self.total)
    }
}

/// Percentage of `total` covered by `processed`, floored and clamped to 0..=100.
/// An unknown (zero) total reports 0.
#[must_use]
pub fn percent_complete(processed: Duration, total: Duration) -> u8 {
    let total_ms = total.as_millis();
    if total_ms == 0 {
        return 0;
    }
    let percent = processed.as_millis().saturating_mul(100) / total_ms;
    percent.min(100) as u8
}

/// Runs an external encoder for one input and one rendition.
///
/// Implementations block until the encoder finishes and return the time it
/// took. Progress updates are delivered through `on_progress` on the calling
/// thread while the invocation runs. Any failure (spawn error, non-zero
/// exit, cancellation) is returned as an error; the caller decides how to
/// contain it.
pub trait TranscodeInvoker: Send + Sync {
    fn invoke(
        &self,
        request: &TranscodeRequest,
        on_progress: &mut dyn FnMut(ProgressUpdate),
    ) -> CoreResult<Duration>;
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Resolves the ffmpeg binary from an optional location override.
///
/// A directory override points at the directory containing `ffmpeg`; any
/// other override is taken as the binary itself. Without an override the
/// binary is looked up on `PATH`.
#[must_use]
pub fn resolve_ffmpeg_executable(location: Option<&Path>) -> PathBuf {
    let binary_name = format!("ffmpeg{}", env::consts::EXE_SUFFIX);
    match location {
        Some(path) if path.is_dir() => path.join(binary_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(binary_name),
    }
}

/// Checks that an external command is available and executable.
///
/// Runs the command with `-version` and only looks at whether it could be
/// started.
pub fn check_dependency(executable: &Path) -> CoreResult<()> {
    let result = Command::new(executable)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", executable.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", executable.display());
            Err(CoreError::DependencyNotFound(
                executable.display().to_string(),
            ))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                executable.display(),
                e
            );
            Err(CoreError::CommandStart(executable.display().to_string(), e))
        }
    }
}
