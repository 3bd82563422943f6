//! Argument-vector construction for the external application.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use scenebatch_configurator::{script_argv, SEPARATOR};
use scenebatch_core::{RenderOptions, SceneUnit, ToolConfig};

/// A fully built command line for rendering one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl RenderCommand {
    /// `<bin> -b <scene> -E <ENGINE> [extra…] -P <script> -- --out-path <out> [overrides…]`
    pub fn build(
        config: &ToolConfig,
        scene: &SceneUnit,
        script: &Path,
        options: &RenderOptions,
    ) -> Self {
        let mut args = vec![
            "-b".to_string(),
            scene.scene_path.to_string_lossy().into_owned(),
            "-E".to_string(),
            config.engine.as_str().to_string(),
        ];
        args.extend(config.extra_args.iter().cloned());
        args.push("-P".to_string());
        args.push(script.to_string_lossy().into_owned());
        args.push(SEPARATOR.to_string());
        args.extend(script_argv(&scene.output_path, options));

        Self {
            program: config.renderer_bin.clone(),
            args,
        }
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.to_string_lossy().into_owned());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// The arguments after the separator, i.e. what the configurator sees.
    pub fn script_args(&self) -> &[String] {
        match self.args.iter().position(|a| a == SEPARATOR) {
            Some(idx) => &self.args[idx + 1..],
            None => &[],
        }
    }
}

impl fmt::Display for RenderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_join(&self.argv()))
    }
}

/// Join `argv` into one shell-style line, quoting arguments that need it.
pub fn shell_join(argv: &[String]) -> String {
    argv.iter().map(|a| quote(a)).collect::<Vec<_>>().join(" ")
}

fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
