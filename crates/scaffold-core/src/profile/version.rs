//! Version comparison for CLI and profile compatibility

use semver::Version;

/// Compare CLI version against the version a profile was written for.
/// Returns a warning message if the CLI is older than the profile expects
pub fn check_compatibility(
    cli_version: &str,
    profile_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli_ver = parse_version(cli_version)?;
    let profile_ver = parse_version(profile_version)?;

    if cli_ver < profile_ver {
        Some(format!(
            "Warning: This profile was written for CLI version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            profile_version, cli_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse a version string, tolerating a leading 'v'.
/// Unparsable versions can't be compared, so they never warn
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).ok()
}
