//! scenebatch — batch-render the scenes of a zip archive with an external renderer.
//!
//! # Usage
//!
//! ```text
//! scenebatch --source-path <zip> [--out-path DIR] [--width N] [--height N]
//!            [--file-format FMT] [--min-samples N] [--max-samples N]
//!            [--noise-threshold X] [--time-limit S]
//!            [--engine RPR|CYCLES] [--renderer-bin PATH] [--dry-run] [--json]
//! scenebatch script [--engine E] [--output FILE]
//! scenebatch plan [--engine E] -- [configurator options]
//! scenebatch config show|path|init
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config::ConfigCommand, plan::PlanArgs, render::RenderArgs, script::ScriptArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "scenebatch",
    version,
    about = "Render every scene in a zip archive through an external renderer",
    long_about = None,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
)]
struct Cli {
    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print or write the configurator script the renderer runs.
    Script(ScriptArgs),

    /// Show which settings the configurator would override for the given options.
    Plan(PlanArgs),

    /// Inspect or create ~/.scenebatch/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Script(args)) => args.run(),
        Some(Commands::Plan(args)) => args.run(),
        Some(Commands::Config { command }) => commands::config::run(command),
        None => cli.render.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
