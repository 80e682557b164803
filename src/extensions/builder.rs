//! Extension Builder Orchestration
//!
//! Drives `CMake` for every registered extension:
//!
//! 1. `cmake --version` once, to fail early when the tool is missing
//! 2. minimum-version check when the platform profile asks for one
//! 3. per extension: configure (`cmake -S -B -D...`), then build
//!    (`cmake --build <dir> -- -j<N>`)
//!
//! Extensions are built one after another; the first failure stops the run.

use super::cmake::{meets_minimum, parse_cmake_version};
use super::command::{
    CommandLine, ConfigureArgs, build_command, configure_command, version_command,
};
use super::descriptor::{ExtensionDescriptor, absolute};
use super::runner::{CommandRunner, ProcessRunner};
use super::sink::{LogSink, sink_for};
use super::types::{BuildConfig, BuildPlan, BuildReport};
use super::workers::resolve_workers;
use crate::debug;
use crate::error::{BuildError, BuildResult, BuildStep};
use crate::platform::PlatformProfile;
use std::fs;
use std::time::{Duration, Instant};

/// Builds extensions with one fixed configuration
#[derive(Debug)]
pub struct ExtensionBuilder {
    config: BuildConfig,
    profile: PlatformProfile,
    sink: Box<dyn LogSink>,
    runner: Box<dyn CommandRunner>,
}

impl ExtensionBuilder {
    /// Builder that logs to `build_log` (if set) and spawns real processes
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        let sink = sink_for(config.options.build_log.as_deref());
        Self::with_parts(config, sink, Box::new(ProcessRunner))
    }

    /// Builder with an explicit sink and runner
    #[must_use]
    pub fn with_parts(
        config: BuildConfig,
        sink: Box<dyn LogSink>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let profile = config.platform.profile();
        Self {
            config,
            profile,
            sink,
            runner,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    #[must_use]
    pub const fn profile(&self) -> PlatformProfile {
        self.profile
    }

    /// Check the tool, then build every extension in order
    pub fn build_all(&self, extensions: &[ExtensionDescriptor]) -> BuildResult<Vec<BuildReport>> {
        let version_output = self.preflight(extensions)?;
        self.check_version(&version_output)?;

        extensions
            .iter()
            .map(|ext| self.build_extension(ext))
            .collect()
    }

    /// Run `cmake --version`, returning its stdout
    ///
    /// A tool that cannot be started at all is reported as
    /// [`BuildError::ToolNotFound`] naming every pending extension.
    pub fn preflight(&self, extensions: &[ExtensionDescriptor]) -> BuildResult<String> {
        let cmd = version_command(&self.config.cmake);
        debug!("preflight: {cmd}");

        match self.runner.capture(&cmd) {
            Ok(captured) if captured.exit.is_success() => Ok(captured.stdout),
            Ok(captured) => Err(self.fail(BuildError::BuildFailed {
                extension: pending_names(extensions).join(", "),
                step: BuildStep::Version,
                code: captured.exit.code,
            })),
            Err(source) => Err(self.fail(BuildError::ToolNotFound {
                extensions: pending_names(extensions),
                source,
            })),
        }
    }

    /// Enforce the platform's minimum `CMake` version, if it has one
    ///
    /// Platforms without a minimum never parse the version text.
    pub fn check_version(&self, version_output: &str) -> BuildResult<()> {
        let Some(required) = self.profile.min_cmake_version else {
            return Ok(());
        };

        let unparseable = || BuildError::ToolVersionUnparseable {
            output: version_output.trim().to_string(),
        };

        let Some(found) = parse_cmake_version(version_output) else {
            return Err(self.fail(unparseable()));
        };

        match meets_minimum(&found, required) {
            Ok(true) => {
                debug!("cmake {found} satisfies >= {required}");
                Ok(())
            }
            Ok(false) => Err(self.fail(BuildError::ToolVersionTooLow {
                found,
                required: required.to_string(),
                platform: self.config.platform.to_string(),
            })),
            Err(e) => {
                debug!("cannot compare cmake version {found}: {e}");
                Err(self.fail(unparseable()))
            }
        }
    }

    /// Compute directories and commands for one extension
    pub fn plan(&self, ext: &ExtensionDescriptor) -> BuildResult<BuildPlan> {
        let output_dir = ext.output_dir(&self.config.build_lib)?;
        let build_dir = absolute(&self.config.build_temp)?;
        let workers = resolve_workers(self.config.options.parallel, self.config.cpu_count);

        let configure = configure_command(&ConfigureArgs {
            cmake: &self.config.cmake,
            source_dir: ext.source_dir(),
            build_dir: &build_dir,
            output_dir: &output_dir,
            interpreter: &self.config.interpreter,
            build_type: &self.config.options.build_type,
            profile: self.profile,
        });
        let build = build_command(&self.config.cmake, &build_dir, self.profile, workers);

        Ok(BuildPlan {
            extension: ext.name().to_string(),
            workers,
            build_dir,
            output_dir,
            configure,
            build,
        })
    }

    /// Configure and build one extension
    pub fn build_extension(&self, ext: &ExtensionDescriptor) -> BuildResult<BuildReport> {
        let start_time = Instant::now();
        let plan = self.plan(ext)?;
        let name = ext.name();

        self.sink
            .info(&format!("[{name}] parallel={}", plan.workers))?;

        fs::create_dir_all(&plan.build_dir).map_err(|source| BuildError::CreateBuildDir {
            path: plan.build_dir.clone(),
            source,
        })?;

        self.sink.info(&format!(
            "[{name}] Building {name} version: {}",
            self.config.package_version
        ))?;
        self.sink
            .info(&format!("[{name}] CMake init command: {}", plan.configure))?;
        self.sink
            .info(&format!("[{name}] CMake build command: {}", plan.build))?;

        self.run_step(name, BuildStep::Configure, &plan.configure)?;
        self.run_step(name, BuildStep::Build, &plan.build)?;

        debug!("built {name} in {:?}", start_time.elapsed());

        Ok(BuildReport {
            extension: plan.extension,
            workers: plan.workers,
            output_dir: plan.output_dir,
            duration: start_time.elapsed(),
        })
    }

    fn run_step(&self, name: &str, step: BuildStep, cmd: &CommandLine) -> BuildResult<()> {
        debug!("[{name}] {step}: {cmd}");

        let streams = self.sink.command_streams()?;
        let exit = self.runner.run(cmd, streams).map_err(|source| {
            self.fail(BuildError::Spawn {
                program: cmd.program().to_string(),
                step,
                source,
            })
        })?;

        if exit.is_success() {
            Ok(())
        } else {
            Err(self.fail(BuildError::BuildFailed {
                extension: name.to_string(),
                step,
                code: exit.code,
            }))
        }
    }

    /// Record an error in the build log and hand it back
    fn fail(&self, err: BuildError) -> BuildError {
        if let Err(log_err) = self.sink.error(&err.to_string()) {
            debug!("could not log error: {log_err}");
        }
        err
    }

    /// Count and total duration of a run
    #[must_use]
    pub fn summarize(reports: &[BuildReport]) -> (usize, Duration) {
        (reports.len(), reports.iter().map(|r| r.duration).sum())
    }
}

fn pending_names(extensions: &[ExtensionDescriptor]) -> Vec<String> {
    extensions.iter().map(|e| e.name().to_string()).collect()
}

/// Build extensions with real processes (convenience function)
///
/// # Example
///
/// ```no_run
/// use cmext::extensions::{BuildConfig, BuildOptions, ExtensionDescriptor, build_extensions};
/// use cmext::interpreter::Interpreter;
///
/// let options = BuildOptions {
///     build_type: "Release".to_string(),
///     parallel: Some(0),
///     ..BuildOptions::default()
/// };
/// let config = BuildConfig::for_host(options, Interpreter::detect(None));
/// let ext = ExtensionDescriptor::new("pkg._core", None).unwrap();
///
/// for report in build_extensions(config, &[ext]).unwrap() {
///     println!("Built {} in {:?}", report.extension, report.duration);
/// }
/// ```
pub fn build_extensions(
    config: BuildConfig,
    extensions: &[ExtensionDescriptor],
) -> BuildResult<Vec<BuildReport>> {
    ExtensionBuilder::new(config).build_all(extensions)
}
