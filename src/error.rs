//! Error types for extension builds
//!
//! Every variant is fatal: the builder stops at the first one and hands it
//! back to the caller untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Which external command a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// `cmake --version` during preflight
    Version,
    /// Build-file generation (`cmake -S ... -B ...`)
    Configure,
    /// Compilation (`cmake --build ...`)
    Build,
}

impl BuildStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Configure => "configure",
            Self::Build => "build",
        }
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("CMake must be installed to build the following extensions: {}", extensions.join(", "))]
    ToolNotFound {
        extensions: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("CMake >= {required} is required on {platform}, found {found}")]
    ToolVersionTooLow {
        found: String,
        required: String,
        platform: String,
    },

    #[error("Could not read a CMake version from: {output}")]
    ToolVersionUnparseable { output: String },

    #[error("CMake {step} step failed for {extension} ({})", describe_exit(*code))]
    BuildFailed {
        extension: String,
        step: BuildStep,
        code: Option<i32>,
    },

    #[error("Invalid extension name {name:?}: expected dotted identifiers like pkg._core")]
    InvalidName { name: String },

    #[error("Failed to resolve source directory {path}: {source}")]
    ResolveSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create build directory {path}: {source}")]
    CreateBuildDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write build log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program} for the {step} step: {source}")]
    Spawn {
        program: String,
        step: BuildStep,
        #[source]
        source: std::io::Error,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit code {c}"),
    )
}

/// Result alias used across the build modules
pub type BuildResult<T> = std::result::Result<T, BuildError>;
