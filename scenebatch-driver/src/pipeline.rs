//! Job pipeline: archive → per-scene render dispatch → report.
//!
//! ## `run` — steps
//!
//! 1. Validate the request (noise threshold, resolution, sample range).
//! 2. Resolve the source archive (`SourceNotFound`).
//! 3. Resolve the output directory (`OutputDirNotFound`); default is the
//!    archive's containing directory.
//! 4. Open the archive (`NotAZipArchive`). Nothing has been created yet.
//! 5. Create the working directory and extract into it.
//! 6. Write the configurator script (unless one is configured).
//! 7. Render each discovered scene in turn, one child process at a time.
//! 8. Remove the working directory. Early returns remove it on drop.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;

use scenebatch_configurator::ScriptGenerator;
use scenebatch_core::{JobReport, JobRequest, SceneOutcome, ToolConfig};

use crate::archive::{discover_scenes, SceneArchive, WorkDir};
use crate::command::RenderCommand;
use crate::error::{io_err, JobError};
use crate::renderer::ExternalRenderer;

/// Run a complete job with `renderer`, returning one outcome per scene.
pub fn run(
    request: &JobRequest,
    config: &ToolConfig,
    renderer: &dyn ExternalRenderer,
) -> Result<JobReport, JobError> {
    let started_at = Utc::now();
    request.validate()?;

    let source = resolve_source(&request.source_path)?;
    let out_dir = resolve_out_dir(request.out_dir.as_deref(), &source)?;
    tracing::info!(
        "job: archive={} out={}",
        source.display(),
        out_dir.display()
    );

    let mut archive = SceneArchive::open(&source)?;
    let work = WorkDir::create_in(&out_dir)?;
    archive.extract_into(&work)?;
    tracing::info!(
        "extracted {} entries into {}",
        archive.len(),
        work.path().display()
    );

    let script = match &config.configurator_script {
        Some(path) => path.clone(),
        None => ScriptGenerator::new()?.write_into(
            work.path(),
            config.engine,
            &config.renderer_bin.to_string_lossy(),
        )?,
    };

    let scenes = discover_scenes(work.path(), &out_dir, &config.scene_extension)?;
    if scenes.is_empty() {
        tracing::warn!(
            "no .{} files found in {}",
            config.scene_extension,
            source.display()
        );
    }

    let mut outcomes = Vec::with_capacity(scenes.len());
    for scene in &scenes {
        let command = RenderCommand::build(config, scene, &script, &request.options);
        tracing::info!("rendering {}", scene.file_name());
        tracing::debug!("command: {command}");

        let clock = Instant::now();
        let outcome = renderer.render(scene, &command)?;
        let elapsed_ms = clock.elapsed().as_millis() as u64;

        if outcome.dry_run {
            tracing::debug!("skipped {} (dry run)", scene.file_name());
        } else if outcome.success {
            tracing::info!("finished {} in {elapsed_ms} ms", scene.file_name());
        } else {
            tracing::warn!(
                "render of {} failed (exit code {:?}); see {}",
                scene.file_name(),
                outcome.exit_code,
                scene.log_path.display()
            );
        }

        outcomes.push(SceneOutcome {
            scene: scene.file_name(),
            output_path: scene.output_path.clone(),
            log_path: scene.log_path.clone(),
            exit_code: outcome.exit_code,
            success: outcome.success,
            dry_run: outcome.dry_run,
            command: command.argv(),
            elapsed_ms,
        });
    }

    work.close()?;
    tracing::info!("removed working directory");

    Ok(JobReport {
        archive: source,
        out_dir,
        engine: config.engine,
        started_at,
        finished_at: Utc::now(),
        scenes: outcomes,
    })
}

fn resolve_source(path: &Path) -> Result<PathBuf, JobError> {
    if !path.exists() {
        return Err(JobError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    path.canonicalize().map_err(|e| io_err(path, e))
}

fn resolve_out_dir(out_dir: Option<&Path>, source: &Path) -> Result<PathBuf, JobError> {
    match out_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(JobError::OutputDirNotFound {
                    path: dir.to_path_buf(),
                });
            }
            dir.canonicalize().map_err(|e| io_err(dir, e))
        }
        None => source
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| JobError::OutputDirNotFound {
                path: source.to_path_buf(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_source_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = resolve_source(&dir.path().join("nope.zip")).unwrap_err();
        assert!(matches!(err, JobError::SourceNotFound { .. }));
    }

    #[test]
    fn out_dir_defaults_to_archive_parent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("scenes.zip");
        let out = resolve_out_dir(None, &source).unwrap();
        assert_eq!(out, dir.path());
    }

    #[test]
    fn file_as_out_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"").unwrap();
        let err = resolve_out_dir(Some(&file), &dir.path().join("s.zip")).unwrap_err();
        assert!(matches!(err, JobError::OutputDirNotFound { .. }));
    }
}
