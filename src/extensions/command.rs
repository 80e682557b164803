//! `CMake` command assembly
//!
//! Pure argument construction: nothing here touches the filesystem or
//! spawns a process, so the exact command lines can be checked in tests and
//! printed by `cmext plan`.

use crate::interpreter::Interpreter;
use crate::platform::PlatformProfile;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn extend<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Convert into a `std::process::Command` ready to spawn
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Inputs for the configure (build-file generation) step
#[derive(Debug, Clone, Copy)]
pub struct ConfigureArgs<'a> {
    pub cmake: &'a Path,
    pub source_dir: &'a Path,
    pub build_dir: &'a Path,
    pub output_dir: &'a Path,
    pub interpreter: &'a Interpreter,
    pub build_type: &'a str,
    pub profile: PlatformProfile,
}

/// `cmake -S<src> -B<build> -D...` with platform architecture flags
#[must_use]
pub fn configure_command(args: &ConfigureArgs<'_>) -> CommandLine {
    let mut cmd = CommandLine::new(args.cmake.display().to_string());
    cmd.arg(format!("-S{}", args.source_dir.display()))
        .arg(format!("-B{}", args.build_dir.display()))
        .arg(format!(
            "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}",
            args.output_dir.display()
        ))
        .arg(format!(
            "-DPYTHON_EXECUTABLE={}",
            args.interpreter.executable.display()
        ))
        .arg(format!("-DCMAKE_BUILD_TYPE={}", args.build_type));

    if args.interpreter.pointer_width.is_64bit() {
        cmd.extend(args.profile.x64_configure_args.iter().copied());
    }

    cmd
}

/// `cmake --build <build> -- [native flags] -j<N>`
#[must_use]
pub fn build_command(
    cmake: &Path,
    build_dir: &Path,
    profile: PlatformProfile,
    workers: usize,
) -> CommandLine {
    let mut cmd = CommandLine::new(cmake.display().to_string());
    cmd.arg("--build")
        .arg(build_dir.display().to_string())
        .arg("--")
        .extend(profile.native_build_args.iter().copied())
        .arg(format!("-j{workers}"));
    cmd
}

/// `cmake --version`
#[must_use]
pub fn version_command(cmake: &Path) -> CommandLine {
    let mut cmd = CommandLine::new(cmake.display().to_string());
    cmd.arg("--version");
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::PointerWidth;
    use crate::platform::HostPlatform;

    fn configure_for(platform: HostPlatform, width: PointerWidth) -> CommandLine {
        let interpreter = Interpreter::new("/usr/bin/python3", width);
        configure_command(&ConfigureArgs {
            cmake: Path::new("cmake"),
            source_dir: Path::new("/src/proj"),
            build_dir: Path::new("/src/proj/build/temp"),
            output_dir: Path::new("/src/proj/build/lib/pkg"),
            interpreter: &interpreter,
            build_type: "Release",
            profile: platform.profile(),
        })
    }

    #[test]
    fn configure_command_on_linux() {
        let cmd = configure_for(HostPlatform::Linux, PointerWidth::Bits64);
        assert_eq!(
            cmd.to_string(),
            "cmake -S/src/proj -B/src/proj/build/temp \
             -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=/src/proj/build/lib/pkg \
             -DPYTHON_EXECUTABLE=/usr/bin/python3 -DCMAKE_BUILD_TYPE=Release"
        );
    }

    #[test]
    fn configure_command_on_windows_64bit_selects_x64() {
        let cmd = configure_for(HostPlatform::Windows, PointerWidth::Bits64);
        assert_eq!(cmd.args().get(5..), Some(&["-A".to_string(), "x64".to_string()][..]));
    }

    #[test]
    fn configure_command_on_windows_32bit_has_no_arch() {
        let cmd = configure_for(HostPlatform::Windows, PointerWidth::Bits32);
        assert_eq!(cmd.args().len(), 5);
    }

    #[test]
    fn build_command_ends_with_job_flag() {
        let cmd = build_command(
            Path::new("cmake"),
            Path::new("build/temp"),
            HostPlatform::Linux.profile(),
            4,
        );
        assert_eq!(cmd.to_string(), "cmake --build build/temp -- -j4");
    }

    #[test]
    fn build_command_on_windows_adds_multiprocessor_flag() {
        let cmd = build_command(
            Path::new("cmake"),
            Path::new("build/temp"),
            HostPlatform::Windows.profile(),
            1,
        );
        assert_eq!(cmd.to_string(), "cmake --build build/temp -- /m -j1");
    }

    #[test]
    fn version_command_shape() {
        assert_eq!(version_command(Path::new("cmake")).to_string(), "cmake --version");
    }
}
