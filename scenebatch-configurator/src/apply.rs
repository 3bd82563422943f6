//! Applying parsed overrides to a live render-settings object.
//!
//! The flow is strictly linear: parse the tokens after `--`, set each
//! present property, render once. No tokens means print usage and stop.

use std::collections::BTreeMap;

use serde::Serialize;

use scenebatch_core::Engine;

use crate::args::{after_separator, parse_error, usage, ScriptArgs};
use crate::error::ConfigureError;
use crate::setting::{Setting, SettingValue};

/// The render-settings object of the open scene.
pub trait RenderSettings {
    /// Assign `value` to the dotted `property` path.
    fn set(&mut self, property: &str, value: SettingValue);

    /// Render the current scene and write the result to disk.
    fn render_still(&mut self) -> Result<(), ConfigureError>;
}

/// A single property assignment performed by [`configure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub property: String,
    pub value: SettingValue,
}

/// What [`configure`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No arguments were given; nothing was rendered.
    Help(String),
    /// Overrides were applied in order and one render was triggered.
    Rendered { applied: Vec<Assignment> },
}

/// Parse `argv` (the host's full argv), apply every present override to
/// `settings`, and trigger one render.
pub fn configure(
    argv: &[String],
    engine: Engine,
    settings: &mut dyn RenderSettings,
) -> Result<Outcome, ConfigureError> {
    let tokens = match after_separator(argv) {
        Some(tokens) if !tokens.is_empty() => tokens,
        _ => return Ok(Outcome::Help(usage())),
    };

    let args = match ScriptArgs::parse_tokens(tokens) {
        Ok(args) => args,
        Err(err) if err.kind() == clap::error::ErrorKind::DisplayHelp => {
            return Ok(Outcome::Help(usage()));
        }
        Err(err) => return Err(parse_error(err)),
    };

    let applied = apply(&args, engine, settings)?;
    settings.render_still()?;
    Ok(Outcome::Rendered { applied })
}

/// Set each present override on `settings` without rendering.
pub fn apply(
    args: &ScriptArgs,
    engine: Engine,
    settings: &mut dyn RenderSettings,
) -> Result<Vec<Assignment>, ConfigureError> {
    let options = args.options();
    options.validate()?;

    let mut applied = Vec::new();
    for setting in Setting::all() {
        let Some(value) = setting.value(args.out_path.as_deref(), &options) else {
            continue;
        };
        for (property, companion) in setting.companions(engine) {
            settings.set(property, companion.clone());
            applied.push(Assignment {
                property: property.to_string(),
                value: companion,
            });
        }
        let property = setting.property(engine);
        settings.set(property, value.clone());
        applied.push(Assignment {
            property: property.to_string(),
            value,
        });
    }
    Ok(applied)
}

// ---------------------------------------------------------------------------
// RecordingSettings
// ---------------------------------------------------------------------------

/// In-memory [`RenderSettings`]: keeps the last value per property and counts renders.
#[derive(Debug, Clone, Default)]
pub struct RecordingSettings {
    values: BTreeMap<String, SettingValue>,
    renders: usize,
}

impl RecordingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-existing engine defaults.
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            renders: 0,
        }
    }

    pub fn get(&self, property: &str) -> Option<&SettingValue> {
        self.values.get(property)
    }

    pub fn values(&self) -> &BTreeMap<String, SettingValue> {
        &self.values
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl RenderSettings for RecordingSettings {
    fn set(&mut self, property: &str, value: SettingValue) {
        self.values.insert(property.to_string(), value);
    }

    fn render_still(&mut self) -> Result<(), ConfigureError> {
        self.renders += 1;
        Ok(())
    }
}
