//! Error types for scenebatch-configurator.

use std::path::PathBuf;

use thiserror::Error;

use scenebatch_core::RequestError;

/// All errors that can arise while configuring a render.
#[derive(Debug, Error)]
pub enum ConfigureError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while writing the generated script.
    #[error("script io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The arguments after `--` could not be parsed.
    #[error("invalid configurator arguments: {0}")]
    Args(String),

    /// Parsed arguments violate a value constraint.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The render-settings target refused to render.
    #[error("render failed: {0}")]
    Render(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigureError {
    ConfigureError::Io {
        path: path.into(),
        source,
    }
}
