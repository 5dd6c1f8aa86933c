// ============================================================================
// encodehls-core/src/playlist.rs
// ============================================================================
//
// MASTER PLAYLIST: Assembly and Writing
//
// Builds the HLS multivariant playlist for one input from its job outcomes.
// Only succeeded variants are listed, in the order given, so a playlist never
// references a rendition that is not on disk. When every job failed the
// playlist still exists and holds just the two header lines.
//
// FORMAT:
//   #EXTM3U
//   #EXT-X-VERSION:3
//   #EXT-X-STREAM-INF:BANDWIDTH=<bitrate>,RESOLUTION=<width>x<height>
//   <profile>/playlist.m3u8
//
// Entries are newline-joined with no trailing newline after the last one.

use crate::encoding::job::JobOutcome;
use crate::encoding::layout::VARIANT_PLAYLIST_NAME;
use crate::error::{CoreError, CoreResult};
use crate::profile::EncodingProfile;

use tempfile::NamedTempFile;

use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the master playlist inside an input's output root.
pub const MASTER_PLAYLIST_NAME: &str = "master.m3u8";

const PLAYLIST_HEADER: &str = "#EXTM3U\n#EXT-X-VERSION:3\n";

/// The two-line stream entry for one variant.
fn variant_entry(profile: &EncodingProfile) -> String {
    let mut info = format!("#EXT-X-STREAM-INF:BANDWIDTH={}", profile.bitrate);
    if let Some(resolution) = profile.resolution() {
        info.push_str(",RESOLUTION=");
        info.push_str(&resolution);
    }
    format!("{info}\n{}/{VARIANT_PLAYLIST_NAME}", profile.name)
}

/// Builds the master playlist text from job outcomes, listing succeeded
/// variants in the order given.
#[must_use]
pub fn assemble_master_playlist(outcomes: &[JobOutcome]) -> String {
    let entries: Vec<String> = outcomes
        .iter()
        .filter(|outcome| outcome.is_success())
        .map(|outcome| variant_entry(&outcome.profile))
        .collect();

    let mut playlist = String::from(PLAYLIST_HEADER);
    playlist.push_str(&entries.join("\n"));
    playlist
}

/// Assembles the master playlist and writes it to `output_root`.
///
/// The content is computed in memory and moved into place in one step, so a
/// reader never observes a partially written playlist.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The path of the written playlist
/// * `Err(CoreError::PlaylistWrite)` - If the file could not be written
pub fn write_master_playlist(output_root: &Path, outcomes: &[JobOutcome]) -> CoreResult<PathBuf> {
    let path = output_root.join(MASTER_PLAYLIST_NAME);
    let content = assemble_master_playlist(outcomes);

    let write_error = |source| CoreError::PlaylistWrite {
        path: path.clone(),
        source,
    };

    let mut temp = NamedTempFile::new_in(output_root).map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.persist(&path).map_err(|e| write_error(e.error))?;

    log::debug!("Wrote master playlist {} ({} bytes)", path.display(), content.len());
    Ok(path)
}
