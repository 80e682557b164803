//! Plan command
//!
//! Show what `cmext build` would run, without touching the filesystem

use super::BuildArgs;
use anyhow::{Context, Result};
use cmext::ExtensionBuilder;

/// Print the configure and build commands for each extension
pub(crate) fn run(args: &BuildArgs) -> Result<()> {
    let prepared = super::prepare(args)?;
    let builder = ExtensionBuilder::new(prepared.config);

    if prepared.extensions.is_empty() && !args.quiet {
        println!("No extensions configured");
    }

    for ext in &prepared.extensions {
        let plan = builder
            .plan(ext)
            .with_context(|| format!("Failed to plan {}", ext.name()))?;

        println!("[{}]", plan.extension);
        println!("  source:    {}", ext.source_dir().display());
        println!("  output:    {}", plan.output_dir.display());
        println!("  build dir: {}", plan.build_dir.display());
        println!("  parallel:  {}", plan.workers);
        println!("  configure: {}", plan.configure);
        println!("  build:     {}", plan.build);
    }

    Ok(())
}
