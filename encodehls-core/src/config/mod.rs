//! Configuration structures and constants for the encodehls-core library.
//!
//! This module holds the run configuration consumed by the orchestrator: the
//! validated profile catalog, encoder selection and concurrency settings. The
//! `settings` submodule loads these from the JSON settings file; `utils` reads
//! environment overrides.

mod builder;
pub mod settings;
pub mod utils;

use crate::error::{CoreError, CoreResult};
use crate::profile::ProfileCatalog;

use std::fmt;
use std::path::PathBuf;

pub use builder::CoreConfigBuilder;
pub use settings::{AppSettings, FfmpegSettings};

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Video encoder used when the settings do not name one.
pub const DEFAULT_VIDEO_ENCODER: &str = "libx264";

/// Audio codec for every rendition.
pub const AUDIO_CODEC: &str = "aac";

/// Audio bitrate for every rendition, in bits per second.
pub const AUDIO_BITRATE: u64 = 128_000;

/// Target HLS segment duration in seconds.
pub const HLS_SEGMENT_DURATION_SECS: u32 = 10;

/// HLS playlist size; 0 keeps every segment in the variant playlist.
pub const HLS_PLAYLIST_SIZE: u32 = 0;

/// Settings file looked up when no explicit path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

// ============================================================================
// RUN MODES
// ============================================================================

/// How the profile jobs of a single input are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Dispatch every profile job at once and join on all of them.
    #[default]
    Parallel,
    /// Run one profile to completion before starting the next.
    Sequential,
}

impl fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyMode::Parallel => write!(f, "parallel"),
            ConcurrencyMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Where each input's renditions and master playlist are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// Directly into the output directory. Only valid for a single input.
    Flat,
    /// Into `<output_dir>/<input base name>/`.
    PerInput,
}

impl OutputLayout {
    /// The layout used when the caller has no explicit preference.
    #[must_use]
    pub fn for_input_count(count: usize) -> Self {
        if count <= 1 {
            OutputLayout::Flat
        } else {
            OutputLayout::PerInput
        }
    }
}

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the encodehls-core library.
///
/// Built once at process start, usually through [`CoreConfigBuilder`], and
/// treated as static input by the orchestrator.
///
/// # Examples
///
/// ```rust
/// use encodehls_core::config::{ConcurrencyMode, CoreConfigBuilder};
/// use encodehls_core::EncodingProfile;
///
/// let config = CoreConfigBuilder::new()
///     .profiles(vec![
///         EncodingProfile::new("480p", 800_000, 854, 480),
///         EncodingProfile::new("720p", 2_500_000, 1280, 720),
///     ])
///     .video_encoder("libx264")
///     .concurrency(ConcurrencyMode::Sequential)
///     .build()
///     .unwrap();
/// assert_eq!(config.profiles.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Renditions to produce, in master playlist order
    pub profiles: ProfileCatalog,

    /// ffmpeg video codec name (e.g. libx264, h264_nvenc)
    pub video_encoder: String,

    /// Optional ffmpeg location: a directory containing the binary or the binary itself
    pub ffmpeg_path: Option<PathBuf>,

    /// Profile job scheduling for each input
    pub concurrency: ConcurrencyMode,

    /// Upper bound on concurrently running profile jobs in parallel mode.
    /// `None` runs one worker per profile.
    pub max_parallel_jobs: Option<usize>,
}

impl CoreConfig {
    /// Creates a configuration with default encoder settings for the given catalog.
    #[must_use]
    pub fn new(profiles: ProfileCatalog) -> Self {
        Self {
            profiles,
            video_encoder: DEFAULT_VIDEO_ENCODER.to_string(),
            ffmpeg_path: None,
            concurrency: ConcurrencyMode::default(),
            max_parallel_jobs: None,
        }
    }

    /// Validates the settings the catalog does not already guarantee.
    pub fn validate(&self) -> CoreResult<()> {
        if self.video_encoder.trim().is_empty() {
            return Err(CoreError::Config("video encoder must not be empty".to_string()));
        }
        if self.video_encoder.chars().any(char::is_whitespace) {
            return Err(CoreError::Config(format!(
                "video encoder '{}' must be a single codec name",
                self.video_encoder
            )));
        }
        if self.max_parallel_jobs == Some(0) {
            return Err(CoreError::Config(
                "max parallel jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of worker threads a parallel run of this catalog uses.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        let per_profile = self.profiles.len().max(1);
        match self.concurrency {
            ConcurrencyMode::Sequential => 1,
            ConcurrencyMode::Parallel => self
                .max_parallel_jobs
                .map_or(per_profile, |cap| cap.clamp(1, per_profile)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::EncodingProfile;

    fn catalog(n: usize) -> ProfileCatalog {
        ProfileCatalog::new(
            (0..n)
                .map(|i| EncodingProfile::new(format!("p{i}"), 500_000 * (i as u64 + 1), 640, 360))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_worker_count_defaults_to_one_per_profile() {
        let config = CoreConfig::new(catalog(3));
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_worker_count_respects_cap_and_mode() {
        let mut config = CoreConfig::new(catalog(4));
        config.max_parallel_jobs = Some(2);
        assert_eq!(config.worker_count(), 2);

        config.max_parallel_jobs = Some(16);
        assert_eq!(config.worker_count(), 4);

        config.concurrency = ConcurrencyMode::Sequential;
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_validate_rejects_blank_encoder_and_zero_jobs() {
        let mut config = CoreConfig::new(catalog(1));
        config.video_encoder = "  ".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.video_encoder = "libx264".to_string();
        config.max_parallel_jobs = Some(0);
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_layout_for_input_count() {
        assert_eq!(OutputLayout::for_input_count(1), OutputLayout::Flat);
        assert_eq!(OutputLayout::for_input_count(2), OutputLayout::PerInput);
    }
}
