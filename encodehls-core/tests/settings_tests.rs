//! Tests for settings file loading
//!
//! These tests verify:
//! - The JSON settings shape with its PascalCase keys
//! - Defaults for an omitted FFmpeg section
//! - Parse errors and invalid profiles surface as configuration errors
//! - An explicit settings path must exist

use encodehls_core::config::settings::locate_settings_file;
use encodehls_core::config::{AppSettings, DEFAULT_VIDEO_ENCODER};
use encodehls_core::{CoreError, EncodingProfile};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const SETTINGS: &str = r#"{
  "FFmpeg": {
    "ExecutablesPath": "/opt/ffmpeg/bin",
    "VideoEncoder": "h264_nvenc"
  },
  "EncodingProfiles": [
    { "Name": "480p", "Bitrate": 800000, "Width": 854, "Height": 480 },
    { "Name": "720p", "Bitrate": 2500000, "Width": 1280, "Height": 720 }
  ]
}"#;

fn write_settings(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("appsettings.json");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_settings_file_parsing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_settings(dir.path(), SETTINGS);

    let settings = AppSettings::from_file(&path)?;
    assert_eq!(
        settings.ffmpeg.executables_path,
        Some(PathBuf::from("/opt/ffmpeg/bin"))
    );
    assert_eq!(settings.ffmpeg.video_encoder, "h264_nvenc");
    assert_eq!(
        settings.encoding_profiles,
        vec![
            EncodingProfile::new("480p", 800_000, 854, 480),
            EncodingProfile::new("720p", 2_500_000, 1280, 720),
        ]
    );

    let config = settings.into_builder().build()?;
    assert_eq!(config.profiles.len(), 2);
    assert_eq!(config.video_encoder, "h264_nvenc");
    assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin")));
    Ok(())
}

#[test]
fn test_ffmpeg_section_is_optional() {
    let dir = tempdir().unwrap();
    let path = write_settings(
        dir.path(),
        r#"{ "EncodingProfiles": [ { "Name": "source", "Bitrate": 4000000 } ] }"#,
    );

    let settings = AppSettings::from_file(&path).unwrap();
    assert_eq!(settings.ffmpeg.executables_path, None);
    assert_eq!(settings.ffmpeg.video_encoder, DEFAULT_VIDEO_ENCODER);
    assert_eq!(settings.encoding_profiles[0].dimensions(), None);
}

#[test]
fn test_malformed_json_is_configuration_error() {
    let dir = tempdir().unwrap();
    let path = write_settings(dir.path(), r#"{ "EncodingProfiles": [ { "Name": "480p", "#);

    let err = AppSettings::from_file(&path).unwrap_err();
    assert!(matches!(err, CoreError::SettingsParse { .. }));
    assert!(err.is_configuration_error());
}

#[test]
fn test_settings_without_profiles_fail_to_build() {
    let dir = tempdir().unwrap();
    let path = write_settings(dir.path(), r#"{ "FFmpeg": { "VideoEncoder": "libx264" } }"#);

    let result = AppSettings::from_file(&path).unwrap().into_builder().build();
    assert!(matches!(result, Err(CoreError::NoProfiles)));
}

#[test]
fn test_explicit_settings_path_must_exist() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        locate_settings_file(Some(&missing)),
        Err(CoreError::Config(_))
    ));

    let present = write_settings(dir.path(), SETTINGS);
    assert_eq!(locate_settings_file(Some(&present)).unwrap(), present);
}
