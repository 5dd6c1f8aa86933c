// ============================================================================
// encodehls-core/src/config/settings.rs
// ============================================================================
//
// SETTINGS FILE: JSON Settings Loading
//
// Loads the process-wide settings file: the ffmpeg section (executable
// location and video encoder) and the ordered list of encoding profiles.
// Values are read once at startup, overlaid with environment overrides and
// handed to CoreConfigBuilder; nothing is reloaded mid-run.
//
// FILE SHAPE:
//   {
//     "FFmpeg": { "ExecutablesPath": "/opt/ffmpeg/bin", "VideoEncoder": "libx264" },
//     "EncodingProfiles": [
//       { "Name": "480p", "Bitrate": 800000, "Width": 854, "Height": 480 }
//     ]
//   }

// ---- Internal crate imports ----
use super::utils::{
    ENV_FFMPEG_PATH, ENV_SETTINGS_FILE, ENV_VIDEO_ENCODER, get_env_path, get_env_string,
};
use super::{CoreConfigBuilder, DEFAULT_SETTINGS_FILE, DEFAULT_VIDEO_ENCODER};
use crate::error::{CoreError, CoreResult};
use crate::profile::EncodingProfile;

// ---- External crate imports ----
use log::debug;
use serde::{Deserialize, Serialize};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ============================================================================
// SETTINGS STRUCTURES
// ============================================================================

/// The `FFmpeg` section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FfmpegSettings {
    /// Directory holding the ffmpeg binary, or the binary itself
    #[serde(default)]
    pub executables_path: Option<PathBuf>,

    /// ffmpeg video codec name
    #[serde(default = "default_video_encoder")]
    pub video_encoder: String,
}

fn default_video_encoder() -> String {
    DEFAULT_VIDEO_ENCODER.to_string()
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        Self {
            executables_path: None,
            video_encoder: default_video_encoder(),
        }
    }
}

/// Everything the settings file can configure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    #[serde(rename = "FFmpeg", default)]
    pub ffmpeg: FfmpegSettings,

    #[serde(default)]
    pub encoding_profiles: Vec<EncodingProfile>,
}

impl AppSettings {
    /// Reads and parses a settings file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings: AppSettings =
            serde_json::from_str(&contents).map_err(|source| CoreError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "Loaded {} encoding profile(s) from {}",
            settings.encoding_profiles.len(),
            path.display()
        );
        Ok(settings)
    }

    /// Overlays `ENCODEHLS_FFMPEG_PATH` and `ENCODEHLS_VIDEO_ENCODER`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.ffmpeg.executables_path =
            get_env_path(ENV_FFMPEG_PATH, self.ffmpeg.executables_path.take());
        self.ffmpeg.video_encoder = get_env_string(
            ENV_VIDEO_ENCODER,
            std::mem::take(&mut self.ffmpeg.video_encoder),
        );
        self
    }

    /// Starts a config builder seeded with these settings.
    #[must_use]
    pub fn into_builder(self) -> CoreConfigBuilder {
        let builder = CoreConfigBuilder::new()
            .profiles(self.encoding_profiles)
            .video_encoder(self.ffmpeg.video_encoder);
        match self.ffmpeg.executables_path {
            Some(path) => builder.ffmpeg_path(path),
            None => builder,
        }
    }
}

// ============================================================================
// SETTINGS DISCOVERY
// ============================================================================

/// Candidate settings locations in lookup order, excluding an explicit path:
/// `ENCODEHLS_CONFIG`, the working directory, then the executable's directory.
#[must_use]
pub fn settings_search_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(from_env) = get_env_path(ENV_SETTINGS_FILE, None) {
        candidates.push(from_env);
    }
    candidates.push(PathBuf::from(DEFAULT_SETTINGS_FILE));
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(DEFAULT_SETTINGS_FILE));
    }
    candidates
}

/// Resolves the settings file to load.
///
/// An explicit path must exist. Otherwise the first existing entry of
/// [`settings_search_paths`] wins; finding none is a configuration error,
/// since a run without profiles cannot start.
pub fn locate_settings_file(explicit: Option<&Path>) -> CoreResult<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(CoreError::Config(format!(
                "Settings file not found: {}",
                path.display()
            )))
        };
    }

    let candidates = settings_search_paths();
    candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> = candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect();
            CoreError::Config(format!(
                "No settings file found (searched: {})",
                searched.join(", ")
            ))
        })
}
