// ============================================================================
// encodehls-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Provides a fluent API for assembling a CoreConfig from settings-file values
// and command-line overrides. `build` validates the profile list into a
// ProfileCatalog and checks the remaining settings, so every configuration
// error surfaces here, before any job starts.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{ConcurrencyMode, CoreConfig, DEFAULT_VIDEO_ENCODER};
use crate::error::CoreResult;
use crate::profile::{EncodingProfile, ProfileCatalog};

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    profiles: Vec<EncodingProfile>,
    video_encoder: String,
    ffmpeg_path: Option<PathBuf>,
    concurrency: ConcurrencyMode,
    max_parallel_jobs: Option<usize>,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
            video_encoder: DEFAULT_VIDEO_ENCODER.to_string(),
            ffmpeg_path: None,
            concurrency: ConcurrencyMode::default(),
            max_parallel_jobs: None,
        }
    }

    /// Replaces the profile list.
    pub fn profiles(mut self, profiles: Vec<EncodingProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Appends one profile to the end of the ladder.
    pub fn profile(mut self, profile: EncodingProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Sets the ffmpeg video codec name.
    pub fn video_encoder(mut self, encoder: impl Into<String>) -> Self {
        self.video_encoder = encoder.into();
        self
    }

    /// Sets the ffmpeg location override (directory or binary).
    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.ffmpeg_path = Some(path);
        self
    }

    /// Sets how profile jobs are scheduled.
    pub fn concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency = mode;
        self
    }

    /// Caps the number of concurrently running profile jobs.
    pub fn max_parallel_jobs(mut self, jobs: usize) -> Self {
        self.max_parallel_jobs = Some(jobs);
        self
    }

    /// Builds and validates the CoreConfig.
    pub fn build(self) -> CoreResult<CoreConfig> {
        let config = CoreConfig {
            profiles: ProfileCatalog::new(self.profiles)?,
            video_encoder: self.video_encoder,
            ffmpeg_path: self.ffmpeg_path,
            concurrency: self.concurrency,
            max_parallel_jobs: self.max_parallel_jobs,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_build_with_defaults() {
        let config = CoreConfigBuilder::new()
            .profile(EncodingProfile::new("360p", 400_000, 640, 360))
            .build()
            .unwrap();

        assert_eq!(config.video_encoder, DEFAULT_VIDEO_ENCODER);
        assert_eq!(config.concurrency, ConcurrencyMode::Parallel);
        assert!(config.ffmpeg_path.is_none());
        assert!(config.max_parallel_jobs.is_none());
    }

    #[test]
    fn test_build_without_profiles_fails() {
        let result = CoreConfigBuilder::new().build();
        assert!(matches!(result, Err(CoreError::NoProfiles)));
    }

    #[test]
    fn test_build_rejects_duplicate_profiles() {
        let result = CoreConfigBuilder::new()
            .profile(EncodingProfile::new("720p", 2_500_000, 1280, 720))
            .profile(EncodingProfile::new("720p", 3_000_000, 1280, 720))
            .build();
        assert!(matches!(result, Err(CoreError::DuplicateProfile(name)) if name == "720p"));
    }
}
