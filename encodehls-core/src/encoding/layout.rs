//! Output paths for inputs and their renditions.
//!
//! ```text
//! <output_dir>/[<input base name>/]master.m3u8
//! <output_dir>/[<input base name>/]<profile>/playlist.m3u8
//! <output_dir>/[<input base name>/]<profile>/segment000.ts
//! ```
//!
//! The input-name level exists only in [`OutputLayout::PerInput`]. Inputs
//! sharing a base name (case-insensitively) are nested under their full file
//! name instead, and any name still taken gets a `_2`, `_3`, ... suffix, so
//! no two inputs of a run share a directory.

use crate::config::OutputLayout;
use crate::error::CoreResult;
use crate::profile::EncodingProfile;
use crate::utils::{get_file_stem_safe, get_filename_safe};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// File name of every variant playlist.
pub const VARIANT_PLAYLIST_NAME: &str = "playlist.m3u8";

/// Segment file template; ffmpeg substitutes a three-digit sequence number.
pub const SEGMENT_FILENAME_PATTERN: &str = "segment%03d.ts";

/// Directories receiving each input's variants and master playlist, in
/// input order. Deterministic for a given input list.
pub fn output_roots(output_dir: &Path, inputs: &[PathBuf], layout: OutputLayout) -> CoreResult<Vec<PathBuf>> {
    if layout == OutputLayout::Flat {
        return Ok(vec![output_dir.to_path_buf(); inputs.len()]);
    }

    let stems = inputs
        .iter()
        .map(|input| get_file_stem_safe(input))
        .collect::<CoreResult<Vec<_>>>()?;
    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for stem in &stems {
        *stem_counts.entry(stem.to_lowercase()).or_default() += 1;
    }

    let mut taken = HashSet::new();
    let mut roots = Vec::with_capacity(inputs.len());
    for (input, stem) in inputs.iter().zip(stems) {
        let base = if stem_counts.get(&stem.to_lowercase()).copied().unwrap_or(0) > 1 {
            get_filename_safe(input)?
        } else {
            stem
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while !taken.insert(name.to_lowercase()) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        roots.push(output_dir.join(name));
    }
    Ok(roots)
}

#[must_use]
pub fn variant_dir(output_root: &Path, profile: &EncodingProfile) -> PathBuf {
    output_root.join(&profile.name)
}

#[must_use]
pub fn variant_playlist_path(output_root: &Path, profile: &EncodingProfile) -> PathBuf {
    variant_dir(output_root, profile).join(VARIANT_PLAYLIST_NAME)
}

#[must_use]
pub fn segment_pattern(output_root: &Path, profile: &EncodingProfile) -> PathBuf {
    variant_dir(output_root, profile).join(SEGMENT_FILENAME_PATTERN)
}
