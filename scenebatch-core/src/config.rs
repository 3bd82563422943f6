//! Tool configuration stored as YAML.
//!
//! # Storage layout
//!
//! ```text
//! ~/.scenebatch/
//!   config.yaml   (mode 0600, optional; defaults apply when absent)
//! ```
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::Engine;

/// Settings that describe how the external application is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program launched once per scene.
    pub renderer_bin: PathBuf,
    pub engine: Engine,
    /// Scene file extension, without the leading dot.
    pub scene_extension: String,
    /// Use this configurator script instead of the generated one.
    pub configurator_script: Option<PathBuf>,
    /// Extra host flags inserted before `-P`.
    pub extra_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            renderer_bin: PathBuf::from("blender"),
            engine: Engine::default(),
            scene_extension: "blend".to_string(),
            configurator_script: None,
            extra_args: Vec::new(),
        }
    }
}

/// `<home>/.scenebatch/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".scenebatch").join("config.yaml")
}

/// Load the config under `home`, falling back to defaults when the file is absent.
///
/// Returns `ConfigError::Parse` (with path) if the YAML is malformed.
pub fn load_at(home: &Path) -> Result<ToolConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(ToolConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    // An empty file deserializes to `null`, which `#[serde(default)]` does not cover.
    if contents.trim().is_empty() {
        return Ok(ToolConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<ToolConfig, ConfigError> {
    load_at(&home()?)
}

/// Write `config` to `<home>/.scenebatch/config.yaml` via a `.tmp` + rename.
pub fn save_at(home: &Path, config: &ToolConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(home);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    let tmp_path = path.with_file_name("config.yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    set_file_permissions(&tmp_path)?;
    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(&path, e));
    }
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &ToolConfig) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config)
}

pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_under_dot_scenebatch() {
        let path = config_path_at(Path::new("/home/u"));
        assert_eq!(path, PathBuf::from("/home/u/.scenebatch/config.yaml"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().unwrap();
        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg, ToolConfig::default());
        assert_eq!(cfg.renderer_bin, PathBuf::from("blender"));
        assert_eq!(cfg.engine, Engine::Rpr);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let home = TempDir::new().unwrap();
        let cfg = ToolConfig {
            renderer_bin: PathBuf::from("/opt/blender/blender"),
            engine: Engine::Cycles,
            extra_args: vec!["--factory-startup".to_string()],
            ..ToolConfig::default()
        };
        save_at(home.path(), &cfg).expect("save");
        assert_eq!(load_at(home.path()).expect("load"), cfg);
    }

    #[test]
    #[cfg(unix)]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let home = TempDir::new().unwrap();
        let path = save_at(home.path(), &ToolConfig::default()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
