//! Environment variable handling.
//!
//! Environment values sit between command-line flags and `cmext.toml` in
//! precedence. Empty values are treated as unset.

use std::env;
use std::path::PathBuf;

// Helper for boolean environment variables that accept "1", "true", "yes"
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| {
        let s = s.to_lowercase();
        s == "1" || s == "true" || s == "yes"
    })
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

/// Get the `CMake` executable override (`CMAKE`).
pub fn cmake() -> Option<PathBuf> {
    non_empty("CMAKE").map(PathBuf::from)
}

/// Get the target interpreter override (`PYTHON`).
pub fn python() -> Option<PathBuf> {
    non_empty("PYTHON").map(PathBuf::from)
}

/// Get the `CMake` build type (`CMEXT_BUILD_TYPE`).
pub fn build_type() -> Option<String> {
    non_empty("CMEXT_BUILD_TYPE")
}

/// Get the build log path (`CMEXT_BUILD_LOG`).
pub fn build_log() -> Option<PathBuf> {
    non_empty("CMEXT_BUILD_LOG").map(PathBuf::from)
}

/// Get the parallelism request (`CMEXT_PARALLEL`); `0` means auto.
pub fn parallel() -> Option<usize> {
    non_empty("CMEXT_PARALLEL").and_then(|s| s.trim().parse().ok())
}

/// Get the `CMake` binary directory (`CMEXT_BUILD_TEMP`).
pub fn build_temp() -> Option<PathBuf> {
    non_empty("CMEXT_BUILD_TEMP").map(PathBuf::from)
}

/// Get the library output root (`CMEXT_BUILD_LIB`).
pub fn build_lib() -> Option<PathBuf> {
    non_empty("CMEXT_BUILD_LIB").map(PathBuf::from)
}

/// Check `CMEXT_DEBUG` (same effect as `--debug`).
pub fn debug_enabled() -> bool {
    is_enabled("CMEXT_DEBUG")
}

/// Skip loading any `cmext.toml` (`CMEXT_NO_CONFIG`).
pub fn no_config() -> bool {
    is_enabled("CMEXT_NO_CONFIG")
}

/// Get the user config directory override (`XDG_CONFIG_HOME`).
pub fn xdg_config_home() -> Option<PathBuf> {
    non_empty("XDG_CONFIG_HOME").map(PathBuf::from)
}
