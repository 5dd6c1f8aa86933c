//! Configuration utility functions
//!
//! This module provides helper functions for reading configuration
//! overrides from environment variables.

use std::path::PathBuf;

/// Environment variable naming the settings file.
pub const ENV_SETTINGS_FILE: &str = "ENCODEHLS_CONFIG";

/// Environment variable overriding the ffmpeg location.
pub const ENV_FFMPEG_PATH: &str = "ENCODEHLS_FFMPEG_PATH";

/// Environment variable overriding the video encoder.
pub const ENV_VIDEO_ENCODER: &str = "ENCODEHLS_VIDEO_ENCODER";

/// Get a string value from an environment variable or use the default.
/// Empty values count as unset.
pub fn get_env_string(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default,
    }
}

/// Get a path value from an environment variable or use the default.
/// Empty values count as unset.
pub fn get_env_path(key: &str, default: Option<PathBuf>) -> Option<PathBuf> {
    match std::env::var_os(key) {
        Some(val) if !val.is_empty() => Some(PathBuf::from(val)),
        _ => default,
    }
}
