//! Script-side argument handling: the flags shared with the driver, splitting
//! at the `--` separator, and building the argv the driver forwards.

use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser};

use scenebatch_core::{FileFormat, RenderOptions};

use crate::error::ConfigureError;
use crate::setting::Setting;

/// The separator the host application stops parsing its own flags at.
pub const SEPARATOR: &str = "--";

/// Render overrides, as accepted on both the driver and the script command line.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct OverrideArgs {
    /// Horizontal resolution in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Vertical resolution in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Output format: TGA, RAWTGA, JPEG, IRIS, IRIZ, AVIRAW, AVIJPEG, PNG, BMP,
    /// HDR, TIFF, OPEN_EXR, OPEN_EXR_MULTILAYER, MPEG, CINEON, DPX, DDS, JP2.
    #[arg(long, value_name = "FORMAT")]
    pub file_format: Option<FileFormat>,

    /// Minimum adaptive samples per pixel.
    #[arg(long)]
    pub min_samples: Option<u32>,

    /// Maximum samples per pixel.
    #[arg(long)]
    pub max_samples: Option<u32>,

    /// Adaptive-sampling noise threshold in [0.0, 1.0].
    #[arg(long, value_parser = parse_unit_interval)]
    pub noise_threshold: Option<f64>,

    /// Render time budget in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub time_limit: Option<u32>,
}

impl OverrideArgs {
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            file_format: self.file_format,
            min_samples: self.min_samples,
            max_samples: self.max_samples,
            noise_threshold: self.noise_threshold,
            time_limit: self.time_limit,
        }
    }
}

impl From<OverrideArgs> for RenderOptions {
    fn from(args: OverrideArgs) -> Self {
        args.to_options()
    }
}

/// Arguments the configurator reads after the separator token.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(
    name = "configure",
    no_binary_name = true,
    about = "Apply render overrides to the open scene and render it to disk",
    after_help = "Run inside the host in background mode:\n  blender --background <scene> --python <script> -- [options]"
)]
pub struct ScriptArgs {
    /// Output file path for this scene (extension is appended by the engine).
    #[arg(long)]
    pub out_path: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

impl ScriptArgs {
    /// Parse the tokens that follow the separator.
    pub fn parse_tokens<I, T>(tokens: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(tokens)
    }

    pub fn options(&self) -> RenderOptions {
        self.overrides.to_options()
    }
}

/// Usage text printed on the no-argument path.
pub fn usage() -> String {
    ScriptArgs::command().render_help().to_string()
}

/// Everything after the first `--`, or `None` when no separator is present.
pub fn after_separator(argv: &[String]) -> Option<&[String]> {
    argv.iter()
        .position(|a| a == SEPARATOR)
        .map(|idx| &argv[idx + 1..])
}

/// Build the script argv for one scene: `--out-path` first, then each present override.
pub fn script_argv(out_path: &Path, options: &RenderOptions) -> Vec<String> {
    let mut argv = Vec::new();
    for setting in Setting::all() {
        if let Some(value) = setting.value(Some(out_path), options) {
            argv.push(setting.flag().to_string());
            argv.push(value.to_arg());
        }
    }
    argv
}

pub(crate) fn parse_error(err: clap::Error) -> ConfigureError {
    ConfigureError::Args(err.to_string())
}

fn parse_unit_interval(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside the range [0.0, 1.0]"))
    }
}
