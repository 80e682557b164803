//! Doctor command - Diagnose common build environment problems
//!
//! This command checks for:
//! - A runnable `CMake`
//! - A `CMake` new enough for this platform
//! - A probeable target interpreter
//! - The worker count `-j` (auto) would resolve to

use anyhow::Result;
use cmext::extensions::cmake::{find_cmake, meets_minimum, parse_cmake_version};
use cmext::extensions::command::version_command;
use cmext::extensions::{CommandRunner, ProcessRunner, resolve_host_workers};
use cmext::{Interpreter, detect_current_platform};
use std::path::Path;

/// Run the doctor command to diagnose common problems.
pub(crate) fn run(cmake: Option<&Path>, python: Option<&Path>, quiet: bool) -> Result<()> {
    run_with(cmake, python, quiet, &ProcessRunner)
}

fn run_with(
    cmake: Option<&Path>,
    python: Option<&Path>,
    quiet: bool,
    runner: &dyn CommandRunner,
) -> Result<()> {
    if !quiet {
        println!("Checking extension build environment...");
        println!();
    }

    let mut has_errors = false;

    let platform = detect_current_platform();
    let profile = platform.profile();
    if !quiet {
        println!("Platform: {platform}");
    }

    let cmake_path = find_cmake(cmake);
    match runner.capture(&version_command(&cmake_path)) {
        Ok(captured) if captured.exit.is_success() => {
            let version = parse_cmake_version(&captured.stdout);
            if !quiet {
                println!(
                    "CMake found: {} ({})",
                    cmake_path.display(),
                    version.as_deref().unwrap_or("unknown version")
                );
            }

            if let Some(required) = profile.min_cmake_version {
                match version.as_deref().map(|v| meets_minimum(v, required)) {
                    Some(Ok(true)) => {
                        if !quiet {
                            println!("CMake satisfies >= {required} on {platform}");
                        }
                    }
                    Some(Ok(false)) => {
                        eprintln!("CMake >= {required} is required on {platform}");
                        has_errors = true;
                    }
                    Some(Err(_)) | None => {
                        eprintln!("Could not determine the CMake version");
                        has_errors = true;
                    }
                }
            }
        }
        Ok(captured) => {
            eprintln!(
                "{} --version failed (exit code {})",
                cmake_path.display(),
                captured
                    .exit
                    .code
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string())
            );
            has_errors = true;
        }
        Err(e) => {
            eprintln!("CMake not found at {}: {e}", cmake_path.display());
            eprintln!("  Install CMake from https://cmake.org or set CMAKE");
            has_errors = true;
        }
    }

    let interpreter = Interpreter::detect(python);
    if !quiet {
        println!(
            "Interpreter: {} ({}-bit)",
            interpreter.executable.display(),
            if interpreter.pointer_width.is_64bit() {
                64
            } else {
                32
            }
        );
        println!("Parallel (auto): {} job(s)", resolve_host_workers(Some(0)));
    }

    if has_errors {
        anyhow::bail!("Issues found with the build environment");
    }

    if !quiet {
        println!();
        println!("No issues found");
    }

    Ok(())
}
