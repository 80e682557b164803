//! Build command
//!
//! Configure and build every requested extension with `CMake`

use super::BuildArgs;
use anyhow::{Context, Result};
use cmext::ExtensionBuilder;

/// Build extensions, stopping at the first failure
pub(crate) fn run(args: &BuildArgs) -> Result<()> {
    let prepared = super::prepare(args)?;

    if prepared.extensions.is_empty() {
        anyhow::bail!(
            "No extensions to build. Add [[extension]] entries to cmext.toml or pass NAME=DIR"
        );
    }

    let builder = ExtensionBuilder::new(prepared.config);

    if !args.quiet {
        let config = builder.config();
        println!(
            "Building {} extension(s) ({}, cmake: {})",
            prepared.extensions.len(),
            config.options.build_type,
            config.cmake.display()
        );
        if let Some(log) = &config.options.build_log {
            println!("  Build log: {}", log.display());
        }
    }

    let reports = builder
        .build_all(&prepared.extensions)
        .context("Extension build failed")?;

    if !args.quiet {
        for report in &reports {
            println!(
                "  Built {} -> {} ({} job(s), {:.1}s)",
                report.extension,
                report.output_dir.display(),
                report.workers,
                report.duration.as_secs_f64()
            );
        }

        let (count, total) = ExtensionBuilder::summarize(&reports);
        println!("{count} extension(s) built in {:.1}s", total.as_secs_f64());
    }

    Ok(())
}
