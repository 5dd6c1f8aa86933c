//! Implementation of the 'profiles' subcommand.

use crate::config::{ConfigOverrides, load_config};
use crate::error::CliResult;

use encodehls_core::{EncodingProfile, format_bitrate};

use std::path::Path;

/// One aligned listing line for a profile.
pub fn profile_line(profile: &EncodingProfile) -> String {
    format!(
        "{:<12} {:<12} {}",
        profile.name,
        profile.resolution().unwrap_or_else(|| "source".to_string()),
        format_bitrate(profile.bitrate)
    )
}

/// Loads and validates the settings, then prints the ladder to stdout.
pub fn run_profiles(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path, &ConfigOverrides::default())?;
    println!("{:<12} {:<12} BITRATE", "NAME", "RESOLUTION");
    for profile in config.profiles.iter() {
        println!("{}", profile_line(profile));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_line() {
        let sized = EncodingProfile::new("720p", 2_500_000, 1280, 720);
        assert_eq!(profile_line(&sized), "720p         1280x720     2500kbps");

        let source = EncodingProfile::source_sized("orig", 6_000_000);
        assert_eq!(profile_line(&source), "orig         source       6000kbps");
    }
}
