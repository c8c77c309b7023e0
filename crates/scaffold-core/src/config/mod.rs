//! Configuration passed into the provisioning routine
//!
//! Everything that differs between project flavors (dependency lists, setup
//! commands, template bodies, the port) lives here as data. Profiles in
//! `crate::profile` are the usual way to build one.

pub mod render;

use crate::manifest::{ScriptsOverlay, UnknownFields};
use serde::{Deserialize, Serialize};

pub use render::render;

/// Port written to the environment file when nothing else is configured
pub const DEFAULT_PORT: u16 = 8080;

/// External commands run while provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupCommands {
    /// Creates the package manifest
    pub init: String,

    /// Prefix for installing runtime dependencies; names are appended
    pub install_runtime: String,

    /// Prefix for installing development dependencies; names are appended
    pub install_dev: String,

    /// Writes the compiler's default configuration file
    pub compiler_init: String,

    /// Extra tool setup (e.g. linter config generation), run after the compiler config
    #[serde(default)]
    pub tooling: Vec<String>,
}

impl Default for SetupCommands {
    fn default() -> Self {
        Self {
            init: "npm init -y".to_string(),
            install_runtime: "npm i -S".to_string(),
            install_dev: "npm i -D".to_string(),
            compiler_init: "npx tsc --init".to_string(),
            tooling: Vec::new(),
        }
    }
}

impl SetupCommands {
    /// Build an install command, or `None` when there is nothing to install
    pub fn install_command(prefix: &str, packages: &[String]) -> Option<String> {
        if packages.is_empty() {
            return None;
        }
        Some(format!("{} {}", prefix, packages.join(" ")))
    }

    /// Every command this configuration may run, in execution order
    pub fn all(&self) -> impl Iterator<Item = &str> {
        [
            self.init.as_str(),
            self.install_runtime.as_str(),
            self.install_dev.as_str(),
            self.compiler_init.as_str(),
        ]
        .into_iter()
        .chain(self.tooling.iter().map(String::as_str))
    }
}

/// Fixed relative paths inside the generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub manifest: String,
    pub env_file: String,
    pub source_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            manifest: "package.json".to_string(),
            env_file: ".env".to_string(),
            source_dir: "src".to_string(),
        }
    }
}

/// A file to write: relative path plus (unrendered) template body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: String,
    pub body: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub compiler_config: TemplateFile,
    pub watcher_config: TemplateFile,
    pub ignore_rules: Vec<TemplateFile>,
    /// Path is relative to `Layout::source_dir`
    pub entry_point: TemplateFile,
}

/// Input of `Scaffolder::run`
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldConfig {
    pub port: u16,
    pub runtime_dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    pub scripts_overlay: ScriptsOverlay,
    pub commands: SetupCommands,
    pub layout: Layout,
    pub templates: Templates,
    pub unknown_fields: UnknownFields,
}

impl ScaffoldConfig {
    /// Values substituted into template bodies
    pub fn render_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("port", self.port.to_string()),
            ("source_dir", self.layout.source_dir.clone()),
        ]
    }

    /// Contents of the environment file
    pub fn env_file_contents(&self) -> String {
        format!("PORT={}", self.port)
    }

    /// Entry point path relative to the project root
    pub fn entry_point_path(&self) -> String {
        format!(
            "{}/{}",
            self.layout.source_dir.trim_end_matches('/'),
            self.templates.entry_point.path
        )
    }
}
