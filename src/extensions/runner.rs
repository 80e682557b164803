//! Subprocess execution
//!
//! The builder never spawns processes directly; it goes through a
//! [`CommandRunner`] so tests can script `CMake`'s behaviour.

use super::command::CommandLine;
use super::sink::CommandStreams;
use std::fmt;
use std::io;

/// How an external command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl Exit {
    #[must_use]
    pub const fn success() -> Self {
        Self { code: Some(0) }
    }

    #[must_use]
    pub const fn with_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<std::process::ExitStatus> for Exit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Output of a command run for its stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub exit: Exit,
    pub stdout: String,
}

/// Runs external commands synchronously
pub trait CommandRunner: fmt::Debug {
    /// Run and collect stdout (used for `cmake --version`)
    fn capture(&self, command: &CommandLine) -> io::Result<Captured>;

    /// Run to completion with the given stream routing
    fn run(&self, command: &CommandLine, streams: CommandStreams) -> io::Result<Exit>;
}

/// Spawns real processes with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn capture(&self, command: &CommandLine) -> io::Result<Captured> {
        let output = command.to_command().output()?;
        Ok(Captured {
            exit: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }

    fn run(&self, command: &CommandLine, streams: CommandStreams) -> io::Result<Exit> {
        let (stdout, stderr) = streams.into_stdio()?;
        let status = command
            .to_command()
            .stdout(stdout)
            .stderr(stderr)
            .status()?;
        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_success_only_for_zero() {
        assert!(Exit::success().is_success());
        assert!(!Exit::with_code(1).is_success());
        assert!(!Exit { code: None }.is_success());
    }

    #[test]
    fn missing_program_is_not_found() {
        let cmd = CommandLine::new("cmext-definitely-not-a-real-program");
        let err = ProcessRunner.capture(&cmd).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
