//! Utility functions for formatting and path handling.
//!
//! These helpers are shared by the job runner, the event handlers and the CLI:
//! duration and bitrate formatting, ffmpeg time parsing, and safe extraction
//! of file names from paths.

use crate::error::{CoreError, CoreResult};

use std::path::Path;
use std::time::Duration;

/// Formats a duration as HH:MM:SS (e.g., 3725s -> "01:02:05"), truncating
/// fractional seconds.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats an elapsed time as seconds with two decimals (e.g., "12.34").
#[must_use]
pub fn format_elapsed_secs(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}

/// Formats a bitrate in bits per second as whole kilobits (e.g., 2500000 -> "2500kbps").
#[must_use]
pub fn format_bitrate(bits_per_second: u64) -> String {
    format!("{}kbps", bits_per_second / 1000)
}

/// Parses an ffmpeg time string (HH:MM:SS.ms) into a duration.
/// Returns None for malformed or negative values.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<Duration> {
    let mut parts = time.trim().split(':');
    let hours = parts.next()?.parse::<f64>().ok()?;
    let minutes = parts.next()?.parse::<f64>().ok()?;
    let seconds = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    Duration::try_from_secs_f64(total).ok()
}

/// Safely extracts the file name from a path.
/// Returns an error if the path has no file name component.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// Safely extracts the file name without its extension (e.g., "movie.mp4" -> "movie").
pub fn get_file_stem_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_stem()
        .ok_or_else(|| {
            CoreError::PathError(format!("Failed to get base name for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}
