//! The option-binding table: [`Setting`] ties each script flag to the
//! render-settings property it overrides.
//!
//! # Property mapping (relative to the active scene)
//!
//! | Setting        | Flag                | RPR                          | CYCLES                        |
//! |----------------|---------------------|------------------------------|-------------------------------|
//! | OutPath        | `--out-path`        | `render.filepath`            | `render.filepath`             |
//! | FileFormat     | `--file-format`     | `render.image_settings.file_format` | same                   |
//! | Width          | `--width`           | `render.resolution_x`        | `render.resolution_x`         |
//! | Height         | `--height`          | `render.resolution_y`        | `render.resolution_y`         |
//! | MinSamples     | `--min-samples`     | `rpr.limits.min_samples`     | `cycles.adaptive_min_samples` |
//! | MaxSamples     | `--max-samples`     | `rpr.limits.max_samples`     | `cycles.samples`              |
//! | NoiseThreshold | `--noise-threshold` | `rpr.limits.noise_threshold` | `cycles.adaptive_threshold`   |
//! | TimeLimit      | `--time-limit`      | `rpr.limits.seconds`         | `cycles.time_limit`           |

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use scenebatch_core::{Engine, RenderOptions};

/// A value assigned to a render-settings property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(u32),
    Float(f64),
    Text(String),
}

impl SettingValue {
    /// Form used on the command line after `--`.
    pub fn to_arg(&self) -> String {
        match self {
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Int(n) => n.to_string(),
            SettingValue::Float(x) => x.to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }

    /// Python literal, as written into the generated script.
    pub fn python_literal(&self) -> String {
        match self {
            SettingValue::Bool(true) => "True".to_string(),
            SettingValue::Bool(false) => "False".to_string(),
            SettingValue::Int(n) => n.to_string(),
            SettingValue::Float(x) => format!("{x:?}"),
            SettingValue::Text(s) => format!("{s:?}"),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}

/// How the script parses a flag's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Int,
    /// Integer of at least 1.
    PositiveInt,
    /// Float restricted to `[0.0, 1.0]`.
    UnitInterval,
    FileFormat,
}

/// Every override the configurator knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    OutPath,
    FileFormat,
    Width,
    Height,
    MinSamples,
    MaxSamples,
    NoiseThreshold,
    TimeLimit,
}

impl Setting {
    /// All settings in application order.
    pub fn all() -> &'static [Setting] {
        &[
            Setting::OutPath,
            Setting::FileFormat,
            Setting::Width,
            Setting::Height,
            Setting::MinSamples,
            Setting::MaxSamples,
            Setting::NoiseThreshold,
            Setting::TimeLimit,
        ]
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Setting::OutPath        => "--out-path",
            Setting::FileFormat     => "--file-format",
            Setting::Width          => "--width",
            Setting::Height         => "--height",
            Setting::MinSamples     => "--min-samples",
            Setting::MaxSamples     => "--max-samples",
            Setting::NoiseThreshold => "--noise-threshold",
            Setting::TimeLimit      => "--time-limit",
        }
    }

    /// Python identifier the parsed value is stored under.
    pub fn dest(&self) -> &'static str {
        match self {
            Setting::OutPath        => "out_path",
            Setting::FileFormat     => "file_format",
            Setting::Width          => "render_width",
            Setting::Height         => "render_height",
            Setting::MinSamples     => "min_samples",
            Setting::MaxSamples     => "max_samples",
            Setting::NoiseThreshold => "noise_threshold",
            Setting::TimeLimit      => "time_limit",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Setting::OutPath => ValueKind::Text,
            Setting::FileFormat => ValueKind::FileFormat,
            Setting::NoiseThreshold => ValueKind::UnitInterval,
            Setting::Width | Setting::Height => ValueKind::PositiveInt,
            Setting::MinSamples
            | Setting::MaxSamples
            | Setting::TimeLimit => ValueKind::Int,
        }
    }

    /// Property path on the scene that this setting overrides.
    pub fn property(&self, engine: Engine) -> &'static str {
        match (self, engine) {
            (Setting::OutPath, _)                      => "render.filepath",
            (Setting::FileFormat, _)                   => "render.image_settings.file_format",
            (Setting::Width, _)                        => "render.resolution_x",
            (Setting::Height, _)                       => "render.resolution_y",
            (Setting::MinSamples, Engine::Rpr)         => "rpr.limits.min_samples",
            (Setting::MinSamples, Engine::Cycles)      => "cycles.adaptive_min_samples",
            (Setting::MaxSamples, Engine::Rpr)         => "rpr.limits.max_samples",
            (Setting::MaxSamples, Engine::Cycles)      => "cycles.samples",
            (Setting::NoiseThreshold, Engine::Rpr)     => "rpr.limits.noise_threshold",
            (Setting::NoiseThreshold, Engine::Cycles)  => "cycles.adaptive_threshold",
            (Setting::TimeLimit, Engine::Rpr)          => "rpr.limits.seconds",
            (Setting::TimeLimit, Engine::Cycles)       => "cycles.time_limit",
        }
    }

    /// Properties that must be set alongside this one.
    ///
    /// Choosing a format forces the engine to append the matching extension.
    /// Cycles ignores its adaptive controls unless adaptive sampling is on.
    pub fn companions(&self, engine: Engine) -> Vec<(&'static str, SettingValue)> {
        match (self, engine) {
            (Setting::FileFormat, _) => {
                vec![("render.use_file_extension", SettingValue::Bool(true))]
            }
            (Setting::MinSamples | Setting::NoiseThreshold, Engine::Cycles) => {
                vec![("cycles.use_adaptive_sampling", SettingValue::Bool(true))]
            }
            _ => vec![],
        }
    }

    /// The value this setting takes for a given request, if present.
    pub fn value(&self, out_path: Option<&Path>, options: &RenderOptions) -> Option<SettingValue> {
        match self {
            Setting::OutPath => {
                out_path.map(|p| SettingValue::Text(p.to_string_lossy().into_owned()))
            }
            Setting::FileFormat => options
                .file_format
                .map(|f| SettingValue::Text(f.as_str().to_string())),
            Setting::Width => options.width.map(SettingValue::Int),
            Setting::Height => options.height.map(SettingValue::Int),
            Setting::MinSamples => options.min_samples.map(SettingValue::Int),
            Setting::MaxSamples => options.max_samples.map(SettingValue::Int),
            Setting::NoiseThreshold => options.noise_threshold.map(SettingValue::Float),
            Setting::TimeLimit => options.time_limit.map(SettingValue::Int),
        }
    }
}
