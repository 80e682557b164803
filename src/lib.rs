//! cmext internal library code
//!
//! Builds native extension modules through `CMake` for a packaging tool's
//! extension-build step.

/// Project manifest looked up in the working directory
pub const MANIFEST_FILE: &str = "cmext.toml";

pub mod config;
pub mod debug;
pub mod env_vars;
pub mod error;
pub mod extensions;
pub mod interpreter;
pub mod platform;

// Re-export common types for convenience
pub use config::{Config, ExtensionEntry, Overrides};
pub use debug::{init_debug, is_debug_enabled};
pub use error::{BuildError, BuildResult, BuildStep};
pub use extensions::{
    BuildConfig, BuildOptions, BuildPlan, BuildReport, ExtensionBuilder, ExtensionDescriptor,
    build_extensions,
};
pub use interpreter::{Interpreter, PointerWidth};
pub use platform::{HostPlatform, PlatformProfile, detect_current_platform};
