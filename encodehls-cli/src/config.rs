// encodehls-cli/src/config.rs
//
// Loads the settings file and layers command-line overrides on top of it.
// Precedence, highest first: command-line flags, environment variables,
// settings file.

use encodehls_core::config::settings::locate_settings_file;
use encodehls_core::config::{AppSettings, ConcurrencyMode, CoreConfig};
use encodehls_core::CoreResult;

use log::info;

use std::path::{Path, PathBuf};

/// Values given on the command line that replace settings-file values.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ffmpeg_path: Option<PathBuf>,
    pub video_encoder: Option<String>,
    pub concurrency: Option<ConcurrencyMode>,
    pub max_parallel_jobs: Option<usize>,
}

/// Finds and parses the settings file, applying environment overrides.
pub fn load_settings(explicit: Option<&Path>) -> CoreResult<(PathBuf, AppSettings)> {
    let path = locate_settings_file(explicit)?;
    let settings = AppSettings::from_file(&path)?.with_env_overrides();
    info!("Using settings file {}", path.display());
    Ok((path, settings))
}

/// Builds the validated run configuration from settings and overrides.
pub fn build_config(settings: AppSettings, overrides: &ConfigOverrides) -> CoreResult<CoreConfig> {
    let mut builder = settings.into_builder();
    if let Some(path) = &overrides.ffmpeg_path {
        builder = builder.ffmpeg_path(path.clone());
    }
    if let Some(encoder) = &overrides.video_encoder {
        builder = builder.video_encoder(encoder.clone());
    }
    if let Some(mode) = overrides.concurrency {
        builder = builder.concurrency(mode);
    }
    if let Some(jobs) = overrides.max_parallel_jobs {
        builder = builder.max_parallel_jobs(jobs);
    }
    builder.build()
}

/// Loads settings and builds the run configuration in one step.
pub fn load_config(explicit: Option<&Path>, overrides: &ConfigOverrides) -> CoreResult<CoreConfig> {
    let (_, settings) = load_settings(explicit)?;
    build_config(settings, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encodehls_core::config::FfmpegSettings;
    use encodehls_core::{CoreError, EncodingProfile};

    fn settings() -> AppSettings {
        AppSettings {
            ffmpeg: FfmpegSettings {
                executables_path: Some(PathBuf::from("/usr/local/bin")),
                video_encoder: "libx264".to_string(),
            },
            encoding_profiles: vec![
                EncodingProfile::new("480p", 800_000, 854, 480),
                EncodingProfile::new("720p", 2_500_000, 1280, 720),
            ],
        }
    }

    #[test]
    fn test_settings_values_without_overrides() {
        let config = build_config(settings(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.video_encoder, "libx264");
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/usr/local/bin")));
        assert_eq!(config.concurrency, ConcurrencyMode::Parallel);
    }

    #[test]
    fn test_command_line_overrides_win() {
        let overrides = ConfigOverrides {
            ffmpeg_path: Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")),
            video_encoder: Some("h264_nvenc".to_string()),
            concurrency: Some(ConcurrencyMode::Sequential),
            max_parallel_jobs: Some(1),
        };
        let config = build_config(settings(), &overrides).unwrap();
        assert_eq!(config.video_encoder, "h264_nvenc");
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert_eq!(config.concurrency, ConcurrencyMode::Sequential);
        assert_eq!(config.max_parallel_jobs, Some(1));
    }

    #[test]
    fn test_invalid_encoder_override_is_rejected() {
        let overrides = ConfigOverrides {
            video_encoder: Some("libx264 -preset fast".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_config(settings(), &overrides),
            Err(CoreError::Config(_))
        ));
    }
}
