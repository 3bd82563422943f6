//! # scenebatch-configurator
//!
//! The in-process half of a batch render: reads the flags that follow the
//! host's `--` separator, applies them to the scene's render settings, and
//! triggers one render-to-file.
//!
//! The host only runs scripts in its own interpreter, so the same
//! [`Setting`] table is used twice: [`configure`] applies it onto any
//! [`RenderSettings`] implementation, and [`ScriptGenerator`] renders it into
//! the script the host actually executes.
//!
//! ```rust,no_run
//! use scenebatch_configurator::{configure, Outcome, RecordingSettings};
//! use scenebatch_core::Engine;
//!
//! let argv: Vec<String> = std::env::args().collect();
//! let mut settings = RecordingSettings::new();
//! if let Ok(Outcome::Rendered { applied }) = configure(&argv, Engine::Rpr, &mut settings) {
//!     for a in applied {
//!         println!("{} = {}", a.property, a.value);
//!     }
//! }
//! ```

pub mod apply;
pub mod args;
pub mod error;
pub mod script;
pub mod setting;

pub use apply::{apply, configure, Assignment, Outcome, RecordingSettings, RenderSettings};
pub use args::{after_separator, script_argv, usage, OverrideArgs, ScriptArgs, SEPARATOR};
pub use error::ConfigureError;
pub use script::{ScriptContext, ScriptGenerator, SCRIPT_FILE_NAME};
pub use setting::{Setting, SettingValue, ValueKind};
