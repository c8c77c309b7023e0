//! Project profiles: the data that parameterizes the provisioning routine
//!
//! This module provides:
//! - Profile manifest types (`profile.yaml`)
//! - Loading from built-in profiles compiled into the binary or a local directory
//! - Version compatibility checking

pub mod builtin;
pub mod version;

use crate::config::{DEFAULT_PORT, Layout, ScaffoldConfig, SetupCommands, TemplateFile, Templates};
use crate::manifest::{ScriptsOverlay, UnknownFields};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use builtin::{BuiltinProfile, BUILTIN_PROFILES, DEFAULT_PROFILE};
pub use version::check_compatibility;

/// Name of the manifest file inside every profile directory
pub const PROFILE_FILE: &str = "profile.yaml";

/// Environment variable pointing at a local profile directory
pub const PROFILE_DIR_ENV: &str = "EXPRESS_INIT_PROFILE_DIR";

/// A script to merge into the generated package manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub name: String,
    pub command: String,
}

/// A generated file and the profile file its body comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Destination path in the generated project
    pub path: String,

    /// Template file name relative to the profile directory
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFiles {
    pub compiler_config: FileEntry,
    pub watcher_config: FileEntry,

    #[serde(default)]
    pub ignore_rules: Vec<FileEntry>,

    /// Destination is relative to the source directory
    pub entry_point: FileEntry,
}

impl ProfileFiles {
    fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        [&self.compiler_config, &self.watcher_config]
            .into_iter()
            .chain(self.ignore_rules.iter())
            .chain(std::iter::once(&self.entry_point))
    }
}

/// Profile manifest (`<profile>/profile.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileManifest {
    /// Display name of the profile
    pub name: String,

    /// Description of what the generated project contains
    pub description: String,

    /// Oldest CLI version the profile was written for
    #[serde(default)]
    pub min_cli_version: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub runtime_dependencies: Vec<String>,

    #[serde(default)]
    pub dev_dependencies: Vec<String>,

    /// Applied in order; a later entry with the same name wins
    #[serde(default)]
    pub scripts: Vec<ScriptEntry>,

    #[serde(default)]
    pub commands: SetupCommands,

    #[serde(default)]
    pub layout: Layout,

    pub files: ProfileFiles,

    /// Instructions shown after the project is created
    #[serde(default)]
    pub next_steps: Vec<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Where a profile is loaded from
#[derive(Debug, Clone)]
pub enum ProfileSource {
    Builtin(&'static BuiltinProfile),
    Local(PathBuf),
}

impl ProfileSource {
    /// Look up a built-in profile by its key (e.g. `express-ts`)
    pub fn builtin(key: &str) -> Result<Self> {
        match builtin::find(key) {
            Some(profile) => Ok(Self::Builtin(profile)),
            None => {
                let available: Vec<_> = BUILTIN_PROFILES.iter().map(|p| p.key).collect();
                anyhow::bail!(
                    "Profile '{}' not found. Available profiles: {}",
                    key,
                    available.join(", ")
                );
            }
        }
    }

    /// Create a local profile source from a directory
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    /// Local directory from `EXPRESS_INIT_PROFILE_DIR` if set, else the default built-in profile
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(PROFILE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::local(PathBuf::from(dir))),
            _ => Self::builtin(DEFAULT_PROFILE),
        }
    }

    /// Human-readable origin for log messages
    pub fn describe(&self) -> String {
        match self {
            Self::Builtin(profile) => format!("built-in profile '{}'", profile.key),
            Self::Local(path) => format!("profile directory {}", path.display()),
        }
    }

    /// Read a file belonging to this profile
    fn read(&self, name: &str) -> Result<String> {
        match self {
            Self::Builtin(profile) => profile
                .file(name)
                .map(str::to_string)
                .with_context(|| format!("Built-in profile '{}' has no file {}", profile.key, name)),
            Self::Local(dir) => {
                let path = dir.join(name);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    /// Load and validate the profile manifest and all template bodies
    pub fn load(&self) -> Result<Profile> {
        let content = self.read(PROFILE_FILE)?;
        let manifest: ProfileManifest = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {} of {}", PROFILE_FILE, self.describe()))?;

        for entry in manifest.files.entries() {
            if entry.path.is_empty() {
                anyhow::bail!("Template '{}' has an empty destination path", entry.template);
            }
        }

        let load = |entry: &FileEntry| -> Result<TemplateFile> {
            let body = self.read(&entry.template)?;
            if body.is_empty() {
                anyhow::bail!("Template '{}' is empty", entry.template);
            }
            Ok(TemplateFile::new(entry.path.clone(), body))
        };

        let templates = Templates {
            compiler_config: load(&manifest.files.compiler_config)?,
            watcher_config: load(&manifest.files.watcher_config)?,
            ignore_rules: manifest
                .files
                .ignore_rules
                .iter()
                .map(&load)
                .collect::<Result<_>>()?,
            entry_point: load(&manifest.files.entry_point)?,
        };

        Ok(Profile {
            manifest,
            templates,
        })
    }
}

/// A fully loaded profile
#[derive(Debug, Clone)]
pub struct Profile {
    pub manifest: ProfileManifest,
    pub templates: Templates,
}

impl Profile {
    /// Build the routine's configuration from this profile
    pub fn to_config(&self, port: Option<u16>, unknown_fields: UnknownFields) -> ScaffoldConfig {
        let scripts_overlay: ScriptsOverlay = self
            .manifest
            .scripts
            .iter()
            .map(|s| (s.name.clone(), s.command.clone()))
            .collect();

        ScaffoldConfig {
            port: port.unwrap_or(self.manifest.port),
            runtime_dependencies: self.manifest.runtime_dependencies.clone(),
            dev_dependencies: self.manifest.dev_dependencies.clone(),
            scripts_overlay,
            commands: self.manifest.commands.clone(),
            layout: self.manifest.layout.clone(),
            templates: self.templates.clone(),
            unknown_fields,
        }
    }
}

/// Print every built-in profile with its description
pub fn print_builtin_profiles() -> Result<()> {
    println!("{}", "Built-in profiles".cyan().bold());
    println!();

    for builtin in BUILTIN_PROFILES {
        let profile = ProfileSource::Builtin(builtin).load()?;
        let marker = if builtin.key == DEFAULT_PROFILE {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", "->".blue(), builtin.key.bold(), marker);
        println!("     {}", profile.manifest.description);
    }

    println!();
    println!(
        "Use {} to load a profile from a directory instead.",
        "--profile-dir".yellow()
    );

    Ok(())
}
