//! FFmpeg command building for HLS renditions
//!
//! This module turns a [`TranscodeRequest`] into the ffmpeg command line that
//! encodes one rendition: video at the profile bitrate and size, AAC audio at
//! a fixed bitrate, segmented by the HLS muxer into fixed-duration `.ts`
//! segments and an unbounded variant playlist.

use super::TranscodeRequest;

use ffmpeg_sidecar::command::FfmpegCommand;

use std::path::Path;

/// Builds the ffmpeg command for one rendition.
///
/// # Arguments
///
/// * `executable` - The ffmpeg binary to run
/// * `request` - Fully materialized rendition parameters
///
/// # Returns
///
/// * The configured `FfmpegCommand`, ready to spawn
pub fn build_hls_command(executable: &Path, request: &TranscodeRequest) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new_with_path(executable);
    cmd.arg("-hide_banner");
    // Re-runs overwrite the previous rendition instead of prompting.
    cmd.arg("-y");

    cmd.input(request.input_path.to_string_lossy().as_ref());

    cmd.args(["-b:v", &request.video_bitrate.to_string()]);
    cmd.args(["-b:a", &request.audio_bitrate.to_string()]);
    if let Some((width, height)) = request.dimensions {
        cmd.args(["-s", &format!("{width}x{height}")]);
    }
    cmd.args(["-c:v", &request.video_codec]);
    cmd.args(["-c:a", &request.audio_codec]);

    cmd.args(["-f", "hls"]);
    cmd.args(["-hls_time", &request.segment_duration_secs.to_string()]);
    cmd.args(["-hls_list_size", &request.playlist_size.to_string()]);
    cmd.args([
        "-hls_segment_filename",
        request.segment_pattern.to_string_lossy().as_ref(),
    ]);

    cmd.output(request.playlist_path.to_string_lossy().as_ref());
    cmd
}

/// Renders a command's arguments as a single line for logging.
#[must_use]
pub fn describe_command(cmd: &FfmpegCommand) -> String {
    cmd.get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
