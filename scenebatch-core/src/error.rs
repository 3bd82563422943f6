//! Error types for scenebatch-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or saving the tool configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// A job request that cannot be executed as given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("noise threshold {0} is outside the range [0.0, 1.0]")]
    NoiseThresholdOutOfRange(f64),

    #[error("{0} must be a positive number of pixels")]
    ZeroResolution(&'static str),

    #[error("min samples ({min}) exceeds max samples ({max})")]
    SampleRangeInverted { min: u32, max: u32 },

    #[error("unknown file format '{0}'")]
    UnknownFileFormat(String),

    #[error("unknown render engine '{0}'; expected: RPR, CYCLES")]
    UnknownEngine(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
