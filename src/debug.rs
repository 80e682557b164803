//! Debug logging utilities
//!
//! Diagnostics behind the global `--debug` flag (or `CMEXT_DEBUG`). These go
//! to stderr and never into the build log.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize debug mode from command-line flag
pub fn init_debug(enabled: bool) {
    let _ = DEBUG_ENABLED.set(enabled || crate::env_vars::debug_enabled());
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Macro for convenient debug logging
///
/// Usage: `debug!("message with {}", variable)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}
