//! scenebatch core library — domain types, tool configuration, errors.
//!
//! - [`types`] — job request, render options, scene units, reports
//! - [`config`] — `~/.scenebatch/config.yaml` load / save
//! - [`error`] — [`ConfigError`], [`RequestError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::ToolConfig;
pub use error::{ConfigError, RequestError};
pub use types::{
    Engine, FileFormat, JobReport, JobRequest, RenderOptions, SceneOutcome, SceneUnit,
};
