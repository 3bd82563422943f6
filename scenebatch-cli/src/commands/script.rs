//! `scenebatch script [--engine E] [--output FILE]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scenebatch_configurator::ScriptGenerator;
use scenebatch_core::{config, Engine};

/// Arguments for `scenebatch script`.
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Engine whose sampling properties the script targets. Defaults to the config file.
    #[arg(long, value_name = "ENGINE")]
    pub engine: Option<Engine>,

    /// Write the script to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ScriptArgs {
    pub fn run(self) -> Result<()> {
        let tool_config = config::load().context("failed to load ~/.scenebatch/config.yaml")?;
        let engine = self.engine.unwrap_or(tool_config.engine);

        let script = ScriptGenerator::new()
            .and_then(|g| g.render(engine, &tool_config.renderer_bin.to_string_lossy()))
            .context("failed to generate configurator script")?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, script)
                    .with_context(|| format!("cannot write '{}'", path.display()))?;
                println!("✓ Wrote {engine} configurator to {}", path.display());
            }
            None => print!("{script}"),
        }
        Ok(())
    }
}
