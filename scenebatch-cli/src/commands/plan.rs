//! `scenebatch plan [--engine E] -- [configurator options]`

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use scenebatch_configurator::{configure, Outcome, RecordingSettings, SEPARATOR};
use scenebatch_core::{config, Engine};

/// Arguments for `scenebatch plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Engine whose property paths are shown. Defaults to the config file.
    #[arg(long, value_name = "ENGINE")]
    pub engine: Option<Engine>,

    /// Options exactly as the configurator receives them after `--`.
    #[arg(last = true, value_name = "OPTIONS")]
    pub script_args: Vec<String>,
}

#[derive(Tabled)]
struct PlanRow {
    property: String,
    value: String,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let engine = match self.engine {
            Some(engine) => engine,
            None => {
                config::load()
                    .context("failed to load ~/.scenebatch/config.yaml")?
                    .engine
            }
        };

        let mut argv = vec!["scenebatch".to_string(), SEPARATOR.to_string()];
        argv.extend(self.script_args);

        let mut settings = RecordingSettings::new();
        let outcome = configure(&argv, engine, &mut settings)
            .context("configurator rejected the options")?;

        match outcome {
            Outcome::Help(usage) => print!("{usage}"),
            Outcome::Rendered { applied } => {
                let rows: Vec<PlanRow> = applied
                    .into_iter()
                    .map(|a| PlanRow {
                        property: format!("scene.{}", a.property),
                        value: a.value.python_literal(),
                    })
                    .collect();
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                println!("{table}");
                println!("then: render and write still ({engine})");
            }
        }
        Ok(())
    }
}
