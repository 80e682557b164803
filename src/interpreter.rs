//! Target interpreter detection
//!
//! The extension is built for the interpreter that will load it, not for
//! this process. `CMake` is told where the interpreter lives, and on some
//! platforms the interpreter's pointer width picks the target architecture.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Interpreter used when neither a flag nor `PYTHON` names one
pub const DEFAULT_INTERPRETER: &str = "python3";

const POINTER_WIDTH_PROBE: &str = "import sys; print(sys.maxsize > 2**32)";

/// Address width of the interpreter binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Width of the running `cmext` binary
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    #[must_use]
    pub const fn is_64bit(self) -> bool {
        matches!(self, Self::Bits64)
    }
}

/// The interpreter an extension is being built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub executable: PathBuf,
    pub pointer_width: PointerWidth,
}

impl Interpreter {
    /// Build a descriptor without running anything
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>, pointer_width: PointerWidth) -> Self {
        Self {
            executable: executable.into(),
            pointer_width,
        }
    }

    /// Locate and probe the target interpreter
    ///
    /// Priority order:
    /// 1. explicit path
    /// 2. `PYTHON` environment variable
    /// 3. `python3` in `PATH`
    ///
    /// Never fails: if the interpreter cannot be probed the host pointer
    /// width is assumed.
    #[must_use]
    pub fn detect(explicit: Option<&Path>) -> Self {
        let executable = explicit
            .map(Path::to_path_buf)
            .or_else(crate::env_vars::python)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INTERPRETER));

        let pointer_width = probe_pointer_width(&executable).unwrap_or_else(|| {
            crate::debug!(
                "could not probe {}, assuming host pointer width",
                executable.display()
            );
            PointerWidth::host()
        });

        Self {
            executable,
            pointer_width,
        }
    }
}

fn probe_pointer_width(executable: &Path) -> Option<PointerWidth> {
    let output = Command::new(executable)
        .args(["-c", POINTER_WIDTH_PROBE])
        .output()
        .ok()?;

    output.status.success().then_some(())?;

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(stdout: &str) -> Option<PointerWidth> {
    match stdout.trim() {
        "True" => Some(PointerWidth::Bits64),
        "False" => Some(PointerWidth::Bits32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_output() {
        assert_eq!(parse_probe_output("True\n"), Some(PointerWidth::Bits64));
        assert_eq!(parse_probe_output("False\r\n"), Some(PointerWidth::Bits32));
        assert_eq!(parse_probe_output(""), None);
        assert_eq!(parse_probe_output("Traceback"), None);
    }

    #[test]
    fn explicit_path_wins() {
        let interpreter = Interpreter::detect(Some(Path::new("/nonexistent/python-x")));
        assert_eq!(interpreter.executable, PathBuf::from("/nonexistent/python-x"));
        // Unprobeable interpreter falls back to the host width
        assert_eq!(interpreter.pointer_width, PointerWidth::host());
    }
}
