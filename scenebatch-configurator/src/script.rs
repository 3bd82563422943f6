//! Tera generation of the configurator script run by the host's embedded
//! interpreter. The script is rendered from the same [`Setting`] table that
//! drives [`crate::apply`], so flags and property paths cannot drift apart.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Tera;

use scenebatch_core::{Engine, FileFormat};

use crate::error::{io_err, ConfigureError};
use crate::setting::{Setting, ValueKind};

/// File name the generated script is written under.
pub const SCRIPT_FILE_NAME: &str = "scenebatch_configure.py";

const TEMPLATE_NAME: &str = "configurator.py";
const TEMPLATE: &str = include_str!("templates/configurator.py.tera");

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Serializable rendering payload for the script template.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptContext {
    pub version: String,
    pub engine: String,
    pub renderer: String,
    pub usage: String,
    pub formats: Vec<String>,
    pub settings: Vec<SettingCtx>,
    /// Dests of the sample bounds, checked as `min <= max` after parsing.
    pub min_samples_dest: String,
    pub max_samples_dest: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingCtx {
    pub flag: String,
    pub dest: String,
    pub property: String,
    /// Extra `add_argument` keywords, e.g. `, type=int`.
    pub type_clause: String,
    pub companions: Vec<CompanionCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanionCtx {
    pub property: String,
    pub literal: String,
}

impl ScriptContext {
    pub fn for_engine(engine: Engine, renderer: &str) -> Self {
        let settings = Setting::all()
            .iter()
            .map(|s| SettingCtx {
                flag: s.flag().to_string(),
                dest: s.dest().to_string(),
                property: s.property(engine).to_string(),
                type_clause: type_clause(s.kind()).to_string(),
                companions: s
                    .companions(engine)
                    .into_iter()
                    .map(|(property, value)| CompanionCtx {
                        property: property.to_string(),
                        literal: value.python_literal(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            engine: engine.as_str().to_string(),
            renderer: renderer.to_string(),
            usage: format!(
                "Run {renderer} in background mode with this script: \
                 {renderer} --background --python <script> -- [options]"
            ),
            formats: FileFormat::all().iter().map(|f| f.as_str().to_string()).collect(),
            settings,
            min_samples_dest: Setting::MinSamples.dest().to_string(),
            max_samples_dest: Setting::MaxSamples.dest().to_string(),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, ConfigureError> {
        tera::Context::from_serialize(self).map_err(ConfigureError::from)
    }
}

fn type_clause(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "",
        ValueKind::Int => ", type=int",
        ValueKind::PositiveInt => ", type=positive_int",
        ValueKind::UnitInterval => ", type=unit_interval",
        ValueKind::FileFormat => ", choices=FILE_FORMATS",
    }
}

// ---------------------------------------------------------------------------
// ScriptGenerator
// ---------------------------------------------------------------------------

/// Renders the configurator script. Create once and reuse.
pub struct ScriptGenerator {
    tera: Tera,
}

impl ScriptGenerator {
    pub fn new() -> Result<Self, ConfigureError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render the script for `engine`, naming `renderer` in its usage text.
    pub fn render(&self, engine: Engine, renderer: &str) -> Result<String, ConfigureError> {
        let ctx = ScriptContext::for_engine(engine, renderer).to_tera_context()?;
        let script = self.tera.render(TEMPLATE_NAME, &ctx)?;
        Ok(script.replace("\r\n", "\n"))
    }

    /// Render the script and write it to `dir/scenebatch_configure.py`.
    pub fn write_into(
        &self,
        dir: &Path,
        engine: Engine,
        renderer: &str,
    ) -> Result<PathBuf, ConfigureError> {
        let path = dir.join(SCRIPT_FILE_NAME);
        let script = self.render(engine, renderer)?;
        std::fs::write(&path, script).map_err(|e| io_err(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_new_succeeds() {
        ScriptGenerator::new().expect("embedded template should parse");
    }

    #[test]
    fn context_lists_every_setting_and_format() {
        let ctx = ScriptContext::for_engine(Engine::Rpr, "blender");
        assert_eq!(ctx.settings.len(), Setting::all().len());
        assert_eq!(ctx.formats.len(), 18);
        assert_eq!(ctx.engine, "RPR");
    }

    #[test]
    fn tera_context_exposes_settings() {
        let ctx = ScriptContext::for_engine(Engine::Cycles, "blender")
            .to_tera_context()
            .expect("context");
        let settings = ctx.get("settings").and_then(|v| v.as_array()).expect("settings");
        assert_eq!(settings.len(), Setting::all().len());
        assert_eq!(
            ctx.get("min_samples_dest").and_then(|v| v.as_str()),
            Some("min_samples")
        );
    }

    #[test]
    fn rendered_script_has_no_crlf_or_template_markers() {
        let script = ScriptGenerator::new()
            .unwrap()
            .render(Engine::Cycles, "blender")
            .unwrap();
        assert!(!script.contains('\r'));
        assert!(!script.contains("{{"));
        assert!(!script.contains("{%"));
    }

    #[test]
    fn write_into_creates_script_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = ScriptGenerator::new()
            .unwrap()
            .write_into(dir.path(), Engine::Rpr, "blender")
            .unwrap();
        assert_eq!(path, dir.path().join(SCRIPT_FILE_NAME));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("import bpy"));
    }
}
