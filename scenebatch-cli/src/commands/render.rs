//! `scenebatch --source-path <zip> [...]` — render every scene in an archive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use scenebatch_configurator::OverrideArgs;
use scenebatch_core::{config, Engine, JobReport, JobRequest, SceneOutcome};
use scenebatch_driver::{pipeline, shell_join, DryRunRenderer, ProcessRenderer};

/// Arguments for a render job.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Zip archive containing the scene files.
    #[arg(long, value_name = "ZIP", required = true)]
    pub source_path: Option<PathBuf>,

    /// Directory for rendered files and logs. Defaults to the archive's directory.
    #[arg(long, value_name = "DIR")]
    pub out_path: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Render engine: RPR | CYCLES. Overrides the config file.
    #[arg(long, value_name = "ENGINE")]
    pub engine: Option<Engine>,

    /// Renderer executable. Overrides the config file.
    #[arg(long, value_name = "PATH")]
    pub renderer_bin: Option<PathBuf>,

    /// Print the commands that would run without starting the renderer.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the job report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let source = self
            .source_path
            .clone()
            .context("provide --source-path <zip>")?;

        let mut tool_config =
            config::load().context("failed to load ~/.scenebatch/config.yaml")?;
        if let Some(engine) = self.engine {
            tool_config.engine = engine;
        }
        if let Some(bin) = self.renderer_bin.clone() {
            tool_config.renderer_bin = bin;
        }

        let mut request = JobRequest::new(&source).with_options(self.overrides.to_options());
        if let Some(out) = self.out_path.clone() {
            request = request.with_out_dir(out);
        }

        let report = if self.dry_run {
            pipeline::run(&request, &tool_config, &DryRunRenderer::new())
        } else {
            pipeline::run(&request, &tool_config, &ProcessRenderer)
        }
        .with_context(|| format!("batch render failed for '{}'", source.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize job report")?
            );
            return Ok(());
        }

        print_report(&report, self.dry_run);
        println!("script finished, exiting");
        Ok(())
    }
}

#[derive(Tabled)]
struct SceneRow {
    scene: String,
    status: String,
    exit: String,
    time: String,
    log: String,
}

impl From<&SceneOutcome> for SceneRow {
    fn from(outcome: &SceneOutcome) -> Self {
        Self {
            scene: outcome.scene.clone(),
            status: status_label(outcome).to_string(),
            exit: outcome
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            time: format_elapsed(outcome.elapsed_ms),
            log: outcome.log_path.display().to_string(),
        }
    }
}

fn print_report(report: &JobReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let total_ms = (report.finished_at - report.started_at)
        .num_milliseconds()
        .max(0) as u64;
    println!(
        "{prefix}scenebatch v{} | {} | {} scenes | {}",
        env!("CARGO_PKG_VERSION"),
        report.engine,
        report.scenes.len(),
        report.out_dir.display(),
    );

    if report.scenes.is_empty() {
        println!("No scene files found in {}.", report.archive.display());
        return;
    }

    if dry_run {
        for outcome in &report.scenes {
            println!("  ~  {}", shell_join(&outcome.command));
        }
        return;
    }

    let rows: Vec<SceneRow> = report.scenes.iter().map(SceneRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let ok = report.succeeded().to_string().green().bold();
    let failed = report.failed();
    let failed = if failed > 0 {
        failed.to_string().red().bold()
    } else {
        failed.to_string().normal()
    };
    println!(
        "{ok} succeeded, {failed} failed in {}",
        format_elapsed(total_ms)
    );
}

fn status_label(outcome: &SceneOutcome) -> &'static str {
    if outcome.dry_run {
        "SKIPPED"
    } else if outcome.success {
        "OK"
    } else if outcome.exit_code.is_none() {
        "NOT RUN"
    } else {
        "FAILED"
    }
}

fn format_elapsed(ms: u64) -> String {
    if ms < 1_000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        format!("{}m{:02}s", ms / 60_000, (ms % 60_000) / 1_000)
    }
}
