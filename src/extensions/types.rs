//! Build configuration and result types
//!
//! [`BuildConfig`] is assembled once (from flags, environment and
//! `cmext.toml`) and is never mutated afterwards; every extension built by
//! one builder sees the same values.

use super::command::CommandLine;
use crate::interpreter::Interpreter;
use crate::platform::{HostPlatform, detect_current_platform};
use std::path::PathBuf;
use std::time::Duration;

/// Build type handed to `CMAKE_BUILD_TYPE` when none is given
pub const DEFAULT_BUILD_TYPE: &str = "Debug";

/// Version reported when the package does not declare one
pub const UNKNOWN_VERSION: &str = "0.0.0";

/// Default `CMake` binary directory
pub const DEFAULT_BUILD_TEMP: &str = "build/temp";

/// Default root for compiled modules
pub const DEFAULT_BUILD_LIB: &str = "build/lib";

/// User-facing build options (`build-type`, `build-log`, `parallel`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// `CMake` build type, e.g. `Debug` or `Release`
    pub build_type: String,
    /// Append build messages and tool output here; `None` discards messages
    pub build_log: Option<PathBuf>,
    /// `None` = sequential, `Some(0)` = auto, `Some(n)` = n workers
    pub parallel: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            build_type: DEFAULT_BUILD_TYPE.to_string(),
            build_log: None,
            parallel: None,
        }
    }
}

/// Everything the builder needs, fixed before the first build
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub options: BuildOptions,
    /// `CMake` binary directory (`-B`)
    pub build_temp: PathBuf,
    /// Root that dotted module paths are laid out under
    pub build_lib: PathBuf,
    /// `CMake` executable
    pub cmake: PathBuf,
    pub interpreter: Interpreter,
    pub platform: HostPlatform,
    /// Logical CPUs used to resolve `parallel = 0`
    pub cpu_count: Option<usize>,
    /// Package version, for the build log
    pub package_version: String,
}

impl BuildConfig {
    /// Configuration for this host with default paths
    #[must_use]
    pub fn for_host(options: BuildOptions, interpreter: Interpreter) -> Self {
        Self {
            options,
            build_temp: PathBuf::from(DEFAULT_BUILD_TEMP),
            build_lib: PathBuf::from(DEFAULT_BUILD_LIB),
            cmake: PathBuf::from(super::cmake::DEFAULT_CMAKE),
            interpreter,
            platform: detect_current_platform(),
            cpu_count: super::workers::host_cpu_count(),
            package_version: UNKNOWN_VERSION.to_string(),
        }
    }
}

/// Commands and directories for one extension, computed without side effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub extension: String,
    pub workers: usize,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    pub configure: CommandLine,
    pub build: CommandLine,
}

/// Result of building an extension
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Extension module name
    pub extension: String,

    /// Worker count passed to the native build tool
    pub workers: usize,

    /// Where the compiled module was placed
    pub output_dir: PathBuf,

    /// Build duration (configure + build)
    pub duration: Duration,
}
