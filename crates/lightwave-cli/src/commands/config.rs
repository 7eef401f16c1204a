//! Rig file management commands.

use anyhow::Context;
use clap::{Args, Subcommand};
use lightwave_config::{RigConfig, default_rig_path, paths::resolve_rig_path};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective rig as TOML
    Show,

    /// Print the rig file location
    Path,

    /// Check the rig file and report every problem
    Validate,

    /// Write a rig file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn target_path(config: Option<&Path>) -> PathBuf {
    config.map_or_else(default_rig_path, Path::to_path_buf)
}

pub fn run(args: ConfigArgs, config: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let rig = RigConfig::load_or_default(config)?;
            print!("{}", rig.to_toml()?);
        }
        ConfigCommand::Path => {
            let path = target_path(config);
            let state = if path.exists() { "" } else { " (not created)" };
            println!("{}{state}", path.display());
        }
        ConfigCommand::Validate => {
            let Some(path) = resolve_rig_path(config) else {
                println!("No rig file; built-in defaults are in use");
                return Ok(());
            };
            RigConfig::load(&path)
                .with_context(|| format!("rig file {} is invalid", path.display()))?;
            println!("{} is valid", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = target_path(config);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            RigConfig::default().save(&path)?;
            tracing::info!(path = %path.display(), "rig file written");
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_the_target() {
        let path = Path::new("/tmp/custom-rig.toml");
        assert_eq!(target_path(Some(path)), path);
        assert_eq!(target_path(None), default_rig_path());
    }
}
