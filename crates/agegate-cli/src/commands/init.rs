//! `agegate init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use agegate_core::AgegateConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, path: &Path) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AgegateConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
