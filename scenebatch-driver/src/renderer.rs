//! The external-renderer seam.
//!
//! The driver never loads a render engine itself; it hands a
//! [`RenderCommand`] to an [`ExternalRenderer`], which must leave the
//! merged stdout/stderr of the render at the scene's log path.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::process::{Command, Stdio};

use scenebatch_core::SceneUnit;

use crate::command::RenderCommand;
use crate::error::{io_err, JobError};

/// What happened when a scene was handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    /// `None` when killed by a signal, never started, or not run.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub dry_run: bool,
}

impl RenderOutcome {
    pub fn finished(exit_code: Option<i32>, success: bool) -> Self {
        Self {
            exit_code,
            success,
            dry_run: false,
        }
    }

    pub fn not_started() -> Self {
        Self::finished(None, false)
    }

    pub fn skipped() -> Self {
        Self {
            exit_code: None,
            success: false,
            dry_run: true,
        }
    }
}

/// Renders one scene per call, synchronously.
pub trait ExternalRenderer {
    /// Run `command` for `scene` and block until it finishes.
    ///
    /// Render failures are reported through the outcome; `Err` is reserved
    /// for problems that should abort the whole job.
    fn render(&self, scene: &SceneUnit, command: &RenderCommand) -> Result<RenderOutcome, JobError>;
}

// ---------------------------------------------------------------------------
// ProcessRenderer
// ---------------------------------------------------------------------------

/// Spawns the external application as a child process.
///
/// stdout and stderr share one handle to the log file, so the log holds the
/// two streams interleaved in the order they were written.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRenderer;

impl ExternalRenderer for ProcessRenderer {
    fn render(&self, scene: &SceneUnit, command: &RenderCommand) -> Result<RenderOutcome, JobError> {
        let log_path = &scene.log_path;
        let stdout = File::create(log_path).map_err(|e| io_err(log_path, e))?;
        let stderr = stdout.try_clone().map_err(|e| io_err(log_path, e))?;

        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status();

        match status {
            Ok(status) => Ok(RenderOutcome::finished(status.code(), status.success())),
            Err(err) => {
                tracing::warn!(
                    "failed to start {}: {err}",
                    command.program.display()
                );
                let mut log = OpenOptions::new()
                    .append(true)
                    .open(log_path)
                    .map_err(|e| io_err(log_path, e))?;
                writeln!(log, "failed to start {}: {err}", command.program.display())
                    .map_err(|e| io_err(log_path, e))?;
                Ok(RenderOutcome::not_started())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DryRunRenderer
// ---------------------------------------------------------------------------

/// Records commands without running them or writing logs.
#[derive(Debug, Default)]
pub struct DryRunRenderer {
    commands: RefCell<Vec<RenderCommand>>,
}

impl DryRunRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands.borrow().clone()
    }
}

impl ExternalRenderer for DryRunRenderer {
    fn render(&self, _scene: &SceneUnit, command: &RenderCommand) -> Result<RenderOutcome, JobError> {
        tracing::info!("[dry-run] would run: {command}");
        self.commands.borrow_mut().push(command.clone());
        Ok(RenderOutcome::skipped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn command(program: &str, args: &[&str]) -> RenderCommand {
        RenderCommand {
            program: PathBuf::from(program),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn dry_run_records_and_writes_nothing() {
        let out = TempDir::new().unwrap();
        let scene = SceneUnit::new("/w/a.blend", out.path());
        let renderer = DryRunRenderer::new();
        let outcome = renderer.render(&scene, &command("blender", &["-b"])).unwrap();
        assert!(outcome.dry_run);
        assert_eq!(renderer.commands().len(), 1);
        assert!(!scene.log_path.exists());
    }

    #[test]
    fn missing_program_is_recorded_in_log() {
        let out = TempDir::new().unwrap();
        let scene = SceneUnit::new("/w/a.blend", out.path());
        let outcome = ProcessRenderer
            .render(&scene, &command("/nonexistent/scenebatch-renderer", &[]))
            .unwrap();
        assert_eq!(outcome, RenderOutcome::not_started());
        let log = std::fs::read_to_string(&scene.log_path).unwrap();
        assert!(log.contains("failed to start"), "{log}");
    }

    #[test]
    #[cfg(unix)]
    fn both_streams_land_in_the_log() {
        let out = TempDir::new().unwrap();
        let scene = SceneUnit::new("/w/a.blend", out.path());
        let outcome = ProcessRenderer
            .render(
                &scene,
                &command("/bin/sh", &["-c", "echo to-stdout; echo to-stderr 1>&2; exit 3"]),
            )
            .unwrap();
        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.success);
        let log = std::fs::read_to_string(Path::new(&scene.log_path)).unwrap();
        assert_eq!(log, "to-stdout\nto-stderr\n");
    }
}
