//! `CMake` tool location and version handling
//!
//! `cmake --version` prints something like:
//! ```text
//! cmake version 3.28.1
//!
//! CMake suite maintained and supported by Kitware (kitware.com/cmake).
//! ```

use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Program name used when nothing else is configured
pub const DEFAULT_CMAKE: &str = "cmake";

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"version\s*([\d.]+)").expect("should build valid regex"));

/// Choose the `CMake` executable
///
/// Priority order:
/// 1. explicit path (flag or `cmext.toml`)
/// 2. `CMAKE` environment variable
/// 3. `cmake`, looked up in `PATH` at spawn time
#[must_use]
pub fn find_cmake(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(crate::env_vars::cmake)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CMAKE))
}

/// Pull the dotted version number out of `cmake --version` output
#[must_use]
pub fn parse_cmake_version(output: &str) -> Option<String> {
    VERSION_PATTERN
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a version leniently into semver
///
/// `CMake` versions can have four parts ("3.1.0.1") or two ("3.1"); only the
/// first three numeric parts are compared.
pub fn parse_lenient_version(version: &str) -> Result<Version, String> {
    let numeric_parts: Vec<&str> = version
        .split(&['.', '-', '+'][..])
        .take(3)
        .filter(|p| p.parse::<u64>().is_ok())
        .collect();

    let normalized = match numeric_parts.as_slice() {
        [] => return Err(format!("No valid version parts in: {version}")),
        [major] => format!("{major}.0.0"),
        [major, minor] => format!("{major}.{minor}.0"),
        [major, minor, patch, ..] => format!("{major}.{minor}.{patch}"),
    };

    Version::parse(&normalized).map_err(|e| e.to_string())
}

/// Check `found >= required`
pub fn meets_minimum(found: &str, required: &str) -> Result<bool, String> {
    Ok(parse_lenient_version(found)? >= parse_lenient_version(required)?)
}
