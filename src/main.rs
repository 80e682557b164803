//! cmext command-line interface
//!
//! Builds native extension modules with `CMake` for a packaging tool

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "cmext")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build native extension modules with CMake", long_about = None)]
pub(crate) struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Show backtraces for errors (requires `RUST_BACKTRACE=1`)
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[allow(clippy::large_enum_variant)]
enum Commands {
    /// Configure and build extensions
    ///
    /// Runs `cmake --version` once, then for each extension the configure
    /// step (`cmake -S -B -D...`) followed by `cmake --build`.
    Build(commands::BuildArgs),

    /// Print the `CMake` commands for each extension without running them
    Plan(commands::BuildArgs),

    /// Check that `CMake` and the target interpreter are usable
    Doctor {
        /// `CMake` executable to check
        #[arg(long, value_name = "PATH")]
        cmake: Option<PathBuf>,

        /// Interpreter to check
        #[arg(long, value_name = "PATH")]
        python: Option<PathBuf>,

        /// Suppress all output except errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let backtrace = cli.backtrace;

    cmext::init_debug(cli.debug);

    let result = match cli.command {
        Commands::Build(args) => commands::build::run(&args),
        Commands::Plan(args) => commands::plan::run(&args),
        Commands::Doctor {
            cmake,
            python,
            quiet,
        } => commands::doctor::run(cmake.as_deref(), python.as_deref(), quiet),
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        display_error(&e, backtrace);
        process::exit(1);
    }
}

mod commands;
