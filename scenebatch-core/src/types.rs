//! Domain types for scenebatch jobs.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Report types are serializable via serde so the CLI can emit them as JSON.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Output container formats understood by the external application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileFormat {
    Tga,
    Rawtga,
    Jpeg,
    Iris,
    Iriz,
    Aviraw,
    Avijpeg,
    Png,
    Bmp,
    Hdr,
    Tiff,
    OpenExr,
    OpenExrMultilayer,
    Mpeg,
    Cineon,
    Dpx,
    Dds,
    Jp2,
}

impl FileFormat {
    /// All formats, in the order the host application lists them.
    pub fn all() -> &'static [FileFormat] {
        &[
            FileFormat::Tga,
            FileFormat::Rawtga,
            FileFormat::Jpeg,
            FileFormat::Iris,
            FileFormat::Iriz,
            FileFormat::Aviraw,
            FileFormat::Avijpeg,
            FileFormat::Png,
            FileFormat::Bmp,
            FileFormat::Hdr,
            FileFormat::Tiff,
            FileFormat::OpenExr,
            FileFormat::OpenExrMultilayer,
            FileFormat::Mpeg,
            FileFormat::Cineon,
            FileFormat::Dpx,
            FileFormat::Dds,
            FileFormat::Jp2,
        ]
    }

    /// Canonical identifier as passed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Tga               => "TGA",
            FileFormat::Rawtga            => "RAWTGA",
            FileFormat::Jpeg              => "JPEG",
            FileFormat::Iris              => "IRIS",
            FileFormat::Iriz              => "IRIZ",
            FileFormat::Aviraw            => "AVIRAW",
            FileFormat::Avijpeg           => "AVIJPEG",
            FileFormat::Png               => "PNG",
            FileFormat::Bmp               => "BMP",
            FileFormat::Hdr               => "HDR",
            FileFormat::Tiff              => "TIFF",
            FileFormat::OpenExr           => "OPEN_EXR",
            FileFormat::OpenExrMultilayer => "OPEN_EXR_MULTILAYER",
            FileFormat::Mpeg              => "MPEG",
            FileFormat::Cineon            => "CINEON",
            FileFormat::Dpx               => "DPX",
            FileFormat::Dds               => "DDS",
            FileFormat::Jp2               => "JP2",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileFormat {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        FileFormat::all()
            .iter()
            .copied()
            .find(|fmt| fmt.as_str() == upper)
            .ok_or_else(|| RequestError::UnknownFileFormat(s.to_string()))
    }
}

/// Render engine selected with the host's `-E` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Engine {
    /// Radeon ProRender.
    #[default]
    Rpr,
    Cycles,
}

impl Engine {
    pub fn all() -> &'static [Engine] {
        &[Engine::Rpr, Engine::Cycles]
    }

    /// Identifier passed after `-E`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Rpr => "RPR",
            Engine::Cycles => "CYCLES",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RPR" => Ok(Engine::Rpr),
            "CYCLES" => Ok(Engine::Cycles),
            _ => Err(RequestError::UnknownEngine(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Optional render overrides shared by the driver and the configurator.
///
/// `None` means "leave the engine default untouched". `Some(0)` is a real
/// value and is forwarded as such.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_format: Option<FileFormat>,
    pub min_samples: Option<u32>,
    pub max_samples: Option<u32>,
    pub noise_threshold: Option<f64>,
    /// Render time budget in seconds, enforced by the engine itself.
    pub time_limit: Option<u32>,
}

impl RenderOptions {
    /// Check every present field against its allowed range.
    pub fn validate(&self) -> Result<(), RequestError> {
        if let Some(threshold) = self.noise_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(RequestError::NoiseThresholdOutOfRange(threshold));
            }
        }
        if self.width == Some(0) {
            return Err(RequestError::ZeroResolution("width"));
        }
        if self.height == Some(0) {
            return Err(RequestError::ZeroResolution("height"));
        }
        if let (Some(min), Some(max)) = (self.min_samples, self.max_samples) {
            if min > max {
                return Err(RequestError::SampleRangeInverted { min, max });
            }
        }
        Ok(())
    }

    /// `true` when no override is set at all.
    pub fn is_empty(&self) -> bool {
        *self == RenderOptions::default()
    }
}

/// A single batch job: one archive, one output directory, one set of overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub source_path: PathBuf,
    /// Defaults to the archive's containing directory when `None`.
    pub out_dir: Option<PathBuf>,
    pub options: RenderOptions,
}

impl JobRequest {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            out_dir: None,
            options: RenderOptions::default(),
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        self.options.validate()
    }
}

// ---------------------------------------------------------------------------
// Scene unit
// ---------------------------------------------------------------------------

/// One scene file discovered in the extracted archive, with its derived outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneUnit {
    pub scene_path: PathBuf,
    /// Render target path without extension; the engine appends one.
    pub output_path: PathBuf,
    pub log_path: PathBuf,
}

impl SceneUnit {
    /// Derive output and log paths for `scene_path` inside `out_dir`.
    ///
    /// `out_dir/<stem>` is the render target; `out_dir/<file name>.log` the log.
    pub fn new(scene_path: impl Into<PathBuf>, out_dir: &Path) -> Self {
        let scene_path = scene_path.into();
        let stem = scene_path
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        let mut log_name = scene_path
            .file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        log_name.push(".log");
        Self {
            output_path: out_dir.join(stem),
            log_path: out_dir.join(log_name),
            scene_path,
        }
    }

    /// File name of the scene, lossily converted for display.
    pub fn file_name(&self) -> String {
        self.scene_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of rendering one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneOutcome {
    pub scene: String,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    /// `None` when the process was killed by a signal or never started.
    pub exit_code: Option<i32>,
    pub success: bool,
    #[serde(default)]
    pub dry_run: bool,
    /// Command that was (or would have been) run.
    pub command: Vec<String>,
    pub elapsed_ms: u64,
}

/// Structured result of a whole job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub archive: PathBuf,
    pub out_dir: PathBuf,
    pub engine: Engine,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub scenes: Vec<SceneOutcome>,
}

impl JobReport {
    pub fn succeeded(&self) -> usize {
        self.scenes.iter().filter(|s| s.success).count()
    }

    pub fn failed(&self) -> usize {
        self.scenes.iter().filter(|s| !s.success && !s.dry_run).count()
    }
}
