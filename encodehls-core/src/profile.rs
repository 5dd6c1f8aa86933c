//! Encoding profiles and the ordered profile catalog.
//!
//! A profile names one rendition of the bitrate ladder. Its name doubles as
//! the variant's directory name and as a path segment inside the master
//! playlist, so the catalog rejects anything that is not a plain, unique
//! directory name before a run starts.

use crate::error::{CoreError, CoreResult};

use serde::{Deserialize, Serialize};

use std::collections::HashSet;

/// One target rendition: a name, a video bitrate and optional dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncodingProfile {
    pub name: String,
    /// Target video bitrate in bits per second.
    pub bitrate: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl EncodingProfile {
    pub fn new(name: impl Into<String>, bitrate: u64, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            bitrate,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Profile that keeps the source dimensions.
    pub fn source_sized(name: impl Into<String>, bitrate: u64) -> Self {
        Self {
            name: name.into(),
            bitrate,
            width: None,
            height: None,
        }
    }

    /// Target dimensions, if both are configured.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }

    /// `WIDTHxHEIGHT`, as used by ffmpeg's `-s` and the HLS `RESOLUTION` attribute.
    #[must_use]
    pub fn resolution(&self) -> Option<String> {
        self.dimensions().map(|(w, h)| format!("{w}x{h}"))
    }

    fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidProfile {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        validate_profile_name(&self.name).map_err(|reason| invalid(reason))?;

        if self.bitrate == 0 {
            return Err(invalid("bitrate must be greater than zero"));
        }

        match (self.width, self.height) {
            (Some(0), _) | (_, Some(0)) => Err(invalid("width and height must be greater than zero")),
            (Some(_), None) | (None, Some(_)) => {
                Err(invalid("width and height must be given together"))
            }
            _ => Ok(()),
        }
    }
}

/// Checks that a profile name is usable as a single directory name.
fn validate_profile_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name must not be empty");
    }
    if name == "." || name == ".." {
        return Err("name must not be '.' or '..'");
    }
    if name.contains(['/', '\\']) {
        return Err("name must not contain path separators");
    }
    if name.chars().any(char::is_control) {
        return Err("name must not contain control characters");
    }
    if name.contains(['<', '>', ':', '"', '|', '?', '*']) {
        return Err("name must not contain characters reserved by the filesystem");
    }
    Ok(())
}

/// The ordered, validated set of profiles a run encodes into.
///
/// Catalog order drives job dispatch and the variant order of every master
/// playlist. Construction fails on the first invalid profile, so a catalog in
/// hand is always non-empty with unique, filesystem-safe names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCatalog {
    profiles: Vec<EncodingProfile>,
}

impl ProfileCatalog {
    pub fn new(profiles: Vec<EncodingProfile>) -> CoreResult<Self> {
        if profiles.is_empty() {
            return Err(CoreError::NoProfiles);
        }

        let mut seen = HashSet::with_capacity(profiles.len());
        for profile in &profiles {
            profile.validate()?;
            // Case-insensitive filesystems would fold these into one directory.
            if !seen.insert(profile.name.to_lowercase()) {
                return Err(CoreError::DuplicateProfile(profile.name.clone()));
            }
        }

        Ok(Self { profiles })
    }

    #[must_use]
    pub fn profiles(&self) -> &[EncodingProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EncodingProfile> {
        self.profiles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EncodingProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

impl<'a> IntoIterator for &'a ProfileCatalog {
    type Item = &'a EncodingProfile;
    type IntoIter = std::slice::Iter<'a, EncodingProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}
