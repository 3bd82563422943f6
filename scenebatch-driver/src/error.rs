//! Error types for scenebatch-driver.

use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

use scenebatch_configurator::ConfigureError;
use scenebatch_core::RequestError;

/// Errors that terminate a job. Per-scene render failures are not errors;
/// they are recorded in the job report.
#[derive(Debug, Error)]
pub enum JobError {
    /// The source archive does not exist.
    #[error("source archive not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The output path is missing or is not a directory.
    #[error("output directory not found: {path}")]
    OutputDirNotFound { path: PathBuf },

    /// The source exists but is not a readable zip archive.
    #[error("not a zip archive: {path}: {source}")]
    NotAZipArchive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    /// The archive opened but could not be fully extracted.
    #[error("failed to extract {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    /// The request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The configurator script could not be generated.
    #[error("configurator error: {0}")]
    Configure(#[from] ConfigureError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`JobError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> JobError {
    JobError::Io {
        path: path.into(),
        source,
    }
}
