//! `scenebatch config show|path|init`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use scenebatch_core::{config, ToolConfig};

/// Inspect or create the tool configuration.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as YAML.
    Show,

    /// Print the config file location.
    Path,

    /// Write a config file with default values.
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(),
        ConfigCommand::Path => path(),
        ConfigCommand::Init(args) => init(args),
    }
}

fn show() -> Result<()> {
    let cfg = config::load().context("failed to load ~/.scenebatch/config.yaml")?;
    print!(
        "{}",
        serde_yaml::to_string(&cfg).context("failed to serialize configuration")?
    );
    Ok(())
}

fn path() -> Result<()> {
    let home = config::home()?;
    println!("{}", config::config_path_at(&home).display());
    Ok(())
}

fn init(args: InitArgs) -> Result<()> {
    let home = config::home()?;
    let path = config::config_path_at(&home);
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
    }
    let written = config::save_at(&home, &ToolConfig::default())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("✓ Wrote default config to {}", written.display());
    Ok(())
}
