//! Platform detection and capabilities
//!
//! The host platform selects a [`PlatformProfile`] from a small capability
//! table. The build sequence only ever reads the profile, so supporting a new
//! platform means adding a row here.

use std::env;
use std::fmt;

/// Host platform tag, derived from Rust's target OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPlatform {
    Windows,
    Linux,
    MacOs,
    /// Any other OS; gets the generic profile
    Other,
}

impl HostPlatform {
    /// Map an `std::env::consts::OS` value to a platform tag
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOs => "Darwin",
            Self::Other => "unknown",
        }
    }

    /// Capabilities for this platform
    #[must_use]
    pub fn profile(self) -> PlatformProfile {
        PROFILES
            .iter()
            .find(|profile| profile.platform == self)
            .copied()
            .unwrap_or_else(|| PlatformProfile::generic(self))
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the platform this process runs on
#[must_use]
pub fn detect_current_platform() -> HostPlatform {
    HostPlatform::from_os(env::consts::OS)
}

/// Platform-specific build behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: HostPlatform,
    /// Oldest `CMake` accepted; `None` skips the version check entirely
    pub min_cmake_version: Option<&'static str>,
    /// Appended to the configure command for a 64-bit interpreter
    pub x64_configure_args: &'static [&'static str],
    /// Appended to the build command after the `--` separator
    pub native_build_args: &'static [&'static str],
}

impl PlatformProfile {
    /// Profile with no checks and no extra arguments
    #[must_use]
    pub const fn generic(platform: HostPlatform) -> Self {
        Self {
            platform,
            min_cmake_version: None,
            x64_configure_args: &[],
            native_build_args: &[],
        }
    }
}

// Only Windows (Visual Studio generators) needs anything beyond the generic row.
const PROFILES: &[PlatformProfile] = &[PlatformProfile {
    platform: HostPlatform::Windows,
    min_cmake_version: Some("3.1.0"),
    x64_configure_args: &["-A", "x64"],
    native_build_args: &["/m"],
}];
