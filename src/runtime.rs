//! Controller runtime deprecation check
//!
//! The controller runtime is the Rust compiler that built this binary,
//! recorded by the build script. Builds from a compiler below the upcoming
//! floor get a one-time deprecation note.

use semver::{Prerelease, Version, VersionReq};

/// Compiler version this binary was built with.
pub const CONTROLLER_RUNTIME: &str = env!("TOOL_RUSTC_VERSION");

/// Minimum toolchain the manifest currently accepts.
pub const SUPPORTED_FLOOR: &str = env!("CARGO_PKG_RUST_VERSION");

/// Floor that upcoming releases will require.
pub const UPCOMING_REQUIREMENT: &str = ">=1.85";

/// Release that will enforce [`UPCOMING_REQUIREMENT`].
pub const ENFORCED_IN: &str = "2.0";

/// Accept `1.74` as well as `1.74.0`.
///
/// Pre-release tags (`1.86.0-nightly`) are dropped so nightly and beta
/// compilers compare by their release number.
fn parse_lenient(version: &str) -> Result<Version, semver::Error> {
    let version = version.trim();
    let mut parsed = match version.matches('.').count() {
        0 => Version::parse(&format!("{version}.0.0")),
        1 => Version::parse(&format!("{version}.0")),
        _ => Version::parse(version),
    }?;
    parsed.pre = Prerelease::EMPTY;
    Ok(parsed)
}

/// Deprecation message when `current` does not meet the upcoming floor.
pub fn controller_notice(current: &str) -> Result<Option<String>, semver::Error> {
    let version = parse_lenient(current)?;
    let required = VersionReq::parse(UPCOMING_REQUIREMENT)?;
    if required.matches(&version) {
        return Ok(None);
    }
    Ok(Some(format!(
        "tool will require a Rust {} controller runtime starting with tool {}. Current version: {}",
        UPCOMING_REQUIREMENT.trim_start_matches(">="),
        ENFORCED_IN,
        version
    )))
}
