//! # scenebatch-driver
//!
//! Unpacks a scene archive and renders every scene in it, one external
//! process at a time.
//!
//! Call [`pipeline::run`] with a [`scenebatch_core::JobRequest`], the tool
//! configuration, and an [`ExternalRenderer`] ([`ProcessRenderer`] for real
//! work, [`DryRunRenderer`] to only build commands).

pub mod archive;
pub mod command;
pub mod error;
pub mod pipeline;
pub mod renderer;

pub use archive::{discover_scenes, SceneArchive, WorkDir, WORK_DIR_PREFIX};
pub use command::{shell_join, RenderCommand};
pub use error::JobError;
pub use pipeline::run;
pub use renderer::{DryRunRenderer, ExternalRenderer, ProcessRenderer, RenderOutcome};
