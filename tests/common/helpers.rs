//! Shared test helpers and utilities

use cmext::extensions::{Captured, CommandLine, CommandRunner, CommandStreams, Exit};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// Get the path to the cmext binary
///
/// This is shared across all integration tests to avoid duplication.
#[allow(dead_code)]
pub(crate) fn get_cmext_binary() -> String {
    env!("CARGO_BIN_EXE_cmext").to_string()
}

/// Runner that answers `cmake --version` from a script and records commands
///
/// Commands passed to `run` succeed unless an exit code was queued. When
/// the builder routes output to a file, a marker line is appended to it so
/// tests can check the ordering of log lines and tool output.
#[derive(Debug, Default, Clone)]
#[allow(dead_code)]
pub(crate) struct ScriptedRunner {
    pub(crate) version: Option<String>,
    pub(crate) exits: Rc<RefCell<Vec<Exit>>>,
    pub(crate) ran: Rc<RefCell<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedRunner {
    pub(crate) fn with_version(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn missing_tool() -> Self {
        Self::default()
    }

    pub(crate) fn then_exit(self, code: i32) -> Self {
        self.exits.borrow_mut().push(Exit::with_code(code));
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.ran.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn capture(&self, _command: &CommandLine) -> io::Result<Captured> {
        self.version.clone().map_or_else(
            || Err(io::Error::from(io::ErrorKind::NotFound)),
            |stdout| {
                Ok(Captured {
                    exit: Exit::success(),
                    stdout,
                })
            },
        )
    }

    fn run(&self, command: &CommandLine, streams: CommandStreams) -> io::Result<Exit> {
        self.ran.borrow_mut().push(command.to_string());

        if let CommandStreams::File(mut file) = streams {
            writeln!(file, "<output of {}>", command.args().first().map_or("", String::as_str))?;
        }

        let mut exits = self.exits.borrow_mut();
        Ok(if exits.is_empty() {
            Exit::success()
        } else {
            exits.remove(0)
        })
    }
}

/// Create a source tree with a minimal `CMakeLists.txt`
#[allow(dead_code)]
pub(crate) fn create_cmake_project(temp_dir: &TempDir, name: &str) -> PathBuf {
    let dir = temp_dir.path().join(name);
    fs::create_dir_all(&dir).expect("Failed to create project dir");
    fs::write(
        dir.join("CMakeLists.txt"),
        "cmake_minimum_required(VERSION 3.1)\nproject(demo CXX)\n",
    )
    .expect("Failed to write CMakeLists.txt");
    dir
}

/// Install a fake `cmake` shell script that records its arguments
///
/// `--version` prints `version_banner`; any other invocation appends its
/// arguments to `calls.txt` next to the script and prints a marker line.
#[cfg(unix)]
#[allow(dead_code)]
pub(crate) fn install_fake_cmake(dir: &std::path::Path, version_banner: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("cmake");
    let calls = dir.join("calls.txt");
    let body = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then\n  echo '{version_banner}'\n  exit 0\nfi\n\
         echo \"$@\" >> '{}'\n\
         echo \"fake cmake $1\"\n\
         echo \"fake cmake stderr\" >&2\n\
         exit {exit_code}\n",
        calls.display()
    );
    fs::write(&script, body).expect("Failed to write fake cmake");
    let mut perms = fs::metadata(&script).expect("stat fake cmake").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod fake cmake");
    script
}
