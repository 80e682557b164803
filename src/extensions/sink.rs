//! Build log sinks
//!
//! A sink receives the builder's progress lines and decides where the
//! output of `CMake` itself goes. With a log file configured both end up in
//! that file; without one, messages are dropped and `CMake` writes straight to
//! the terminal.

use crate::error::{BuildError, BuildResult};
use std::cell::RefCell;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::rc::Rc;

/// Severity of a build log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// Where a subprocess's stdout and stderr should go
#[derive(Debug)]
pub enum CommandStreams {
    /// Share the parent's terminal
    Inherit,
    /// Append both streams to this file
    File(File),
}

impl CommandStreams {
    /// Split into `(stdout, stderr)` handles for `Command`
    pub fn into_stdio(self) -> std::io::Result<(Stdio, Stdio)> {
        match self {
            Self::Inherit => Ok((Stdio::inherit(), Stdio::inherit())),
            Self::File(file) => {
                let stderr = file.try_clone()?;
                Ok((Stdio::from(file), Stdio::from(stderr)))
            }
        }
    }
}

/// Destination for build log messages
pub trait LogSink: fmt::Debug {
    /// Record one message
    fn write(&self, level: LogLevel, message: &str) -> BuildResult<()>;

    /// Streams for the next external command
    fn command_streams(&self) -> BuildResult<CommandStreams>;

    fn info(&self, message: &str) -> BuildResult<()> {
        self.write(LogLevel::Info, message)
    }

    fn error(&self, message: &str) -> BuildResult<()> {
        self.write(LogLevel::Error, message)
    }
}

/// Pick the sink for an optional `build-log` path
#[must_use]
pub fn sink_for(build_log: Option<&Path>) -> Box<dyn LogSink> {
    match build_log {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(NullSink),
    }
}

fn format_line(level: LogLevel, message: &str) -> String {
    match level {
        LogLevel::Info => format!("{message}\n"),
        LogLevel::Error => format!("[ERROR] {message}\n"),
    }
}

/// Appends every message to a file, opening and closing it per write
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> BuildResult<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| BuildError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }
}

impl LogSink for FileSink {
    fn write(&self, level: LogLevel, message: &str) -> BuildResult<()> {
        let mut file = self.open()?;
        file.write_all(format_line(level, message).as_bytes())
            .map_err(|source| BuildError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }

    fn command_streams(&self) -> BuildResult<CommandStreams> {
        self.open().map(CommandStreams::File)
    }
}

/// Drops every message; commands inherit the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _level: LogLevel, _message: &str) -> BuildResult<()> {
        Ok(())
    }

    fn command_streams(&self) -> BuildResult<CommandStreams> {
        Ok(CommandStreams::Inherit)
    }
}

/// Keeps formatted lines in memory
///
/// Clones share one buffer, so a caller can hand a clone to the builder and
/// read the lines back afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, without trailing newlines
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: LogLevel, message: &str) -> BuildResult<()> {
        let line = format_line(level, message);
        self.lines
            .borrow_mut()
            .push(line.trim_end_matches('\n').to_string());
        Ok(())
    }

    fn command_streams(&self) -> BuildResult<CommandStreams> {
        Ok(CommandStreams::Inherit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_sink_appends_lines() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("build.log");
        fs::write(&log, "earlier run\n").unwrap();

        let sink = FileSink::new(&log);
        sink.info("[pkg._core] parallel=4").unwrap();
        sink.error("CMake >= 3.1.0 is required on Windows").unwrap();

        assert_eq!(
            fs::read_to_string(&log).unwrap(),
            "earlier run\n[pkg._core] parallel=4\n[ERROR] CMake >= 3.1.0 is required on Windows\n"
        );
    }

    #[test]
    fn file_sink_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("fresh.log");

        FileSink::new(&log).info("hello").unwrap();

        assert_eq!(fs::read_to_string(&log).unwrap(), "hello\n");
    }

    #[test]
    fn file_sink_reports_unwritable_path() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("missing-dir").join("build.log");

        let err = FileSink::new(&log).info("hello").unwrap_err();
        assert!(matches!(err, BuildError::LogWrite { .. }));
    }

    #[test]
    fn null_sink_drops_messages() {
        let sink = sink_for(None);

        sink.info("dropped").unwrap();
        sink.error("also dropped").unwrap();

        assert!(matches!(
            sink.command_streams().unwrap(),
            CommandStreams::Inherit
        ));
    }

    #[test]
    fn memory_sink_clones_share_lines() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.info("first").unwrap();
        sink.error("second").unwrap();

        assert_eq!(handle.lines(), vec!["first", "[ERROR] second"]);
    }
}
