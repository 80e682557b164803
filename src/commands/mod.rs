//! Subcommand implementations

pub(crate) mod build;
pub(crate) mod completion;
pub(crate) mod doctor;
pub(crate) mod plan;

use anyhow::{Context, Result};
use clap::Args;
use cmext::config::{Config, Overrides};
use cmext::{BuildConfig, ExtensionDescriptor};
use std::path::PathBuf;

/// Arguments shared by `build` and `plan`
#[derive(Debug, Args)]
pub(crate) struct BuildArgs {
    /// Extensions as NAME or NAME=DIR (defaults to the `[[extension]]` entries in cmext.toml)
    #[arg(value_name = "EXT")]
    pub(crate) extensions: Vec<String>,

    /// `CMake` build type (Debug, Release, RelWithDebInfo, ...)
    #[arg(long, value_name = "TYPE")]
    pub(crate) build_type: Option<String>,

    /// Append build messages and `CMake` output to this file
    #[arg(long, value_name = "PATH")]
    pub(crate) build_log: Option<PathBuf>,

    /// Parallel build jobs (`-j=N`); `-j` without a value (or 0) uses half the CPUs
    #[arg(
        long,
        short = 'j',
        value_name = "N",
        num_args(0..=1),
        require_equals(true),
        default_missing_value = "0"
    )]
    pub(crate) parallel: Option<usize>,

    /// `CMake` binary directory
    #[arg(long, value_name = "DIR")]
    pub(crate) build_temp: Option<PathBuf>,

    /// Root directory for compiled modules
    #[arg(long, value_name = "DIR")]
    pub(crate) build_lib: Option<PathBuf>,

    /// `CMake` executable (default: $CMAKE, then cmake in PATH)
    #[arg(long, value_name = "PATH")]
    pub(crate) cmake: Option<PathBuf>,

    /// Interpreter the extensions are built for (default: $PYTHON, then python3)
    #[arg(long, value_name = "PATH")]
    pub(crate) python: Option<PathBuf>,

    /// Package version recorded in the build log
    #[arg(long, value_name = "VERSION")]
    pub(crate) package_version: Option<String>,

    /// Project manifest to use instead of ./cmext.toml
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    pub(crate) config: Option<PathBuf>,

    /// Ignore cmext.toml and user configuration
    #[arg(long)]
    pub(crate) no_config: bool,

    /// Suppress all output except errors
    #[arg(long, short)]
    pub(crate) quiet: bool,
}

impl BuildArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            build_type: self.build_type.clone(),
            build_log: self.build_log.clone(),
            parallel: self.parallel,
            build_temp: self.build_temp.clone(),
            build_lib: self.build_lib.clone(),
            cmake: self.cmake.clone(),
            python: self.python.clone(),
            package_version: self.package_version.clone(),
        }
    }
}

/// Resolved configuration and extension list for a build or plan
#[derive(Debug)]
pub(crate) struct Prepared {
    pub(crate) config: BuildConfig,
    pub(crate) extensions: Vec<ExtensionDescriptor>,
}

/// Load config, apply flag and environment overrides, collect extensions
pub(crate) fn prepare(args: &BuildArgs) -> Result<Prepared> {
    let config = Config::load_with_options(args.config.as_deref(), args.no_config)
        .context("Failed to load configuration")?;

    let build_config = config.build_config(args.overrides().or(Overrides::from_env()));

    let extensions = if args.extensions.is_empty() {
        config.descriptors()?
    } else {
        args.extensions
            .iter()
            .map(|spec| {
                ExtensionDescriptor::parse(spec)
                    .with_context(|| format!("Invalid extension argument: {spec}"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    cmext::debug!(
        "{} extension(s), build type {}, parallel {:?}",
        extensions.len(),
        build_config.options.build_type,
        build_config.options.parallel
    );

    Ok(Prepared {
        config: build_config,
        extensions,
    })
}
