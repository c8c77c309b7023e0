//! Scaffold Core - provisioning library for Express + TypeScript project skeletons
//!
//! This library creates a minimal web-service project in a target directory:
//! package manifest, compiler config, environment file, ignore rules, watcher
//! config and a "Hello World" entry point.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Executor** - Four validated primitives (run command, create directory,
//!   write file, read file) behind swappable `CommandRunner` / `FileSystem` backends
//! - **Layer 2: Provisioning** - `Scaffolder` runs the fixed step sequence from a
//!   `ScaffoldConfig`; `profile` turns YAML profiles into that config
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffold_core::{Executor, ProfileSource, Scaffolder, SilentReporter, UnknownFields};
//!
//! let profile = ProfileSource::builtin("express-ts")?.load()?;
//! let config = profile.to_config(Some(3000), UnknownFields::Drop);
//!
//! let executor = Executor::new("./my-service");
//! let report = Scaffolder::new(&executor, &SilentReporter).run(&config).await?;
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod profile;
pub mod runtime;
pub mod scaffold;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ScaffoldConfig, SetupCommands, TemplateFile, Templates};
pub use error::{ScaffoldError, ScaffoldResult};
pub use executor::{CommandOutcome, CommandRunner, Executor, FileSystem, StdioMode};
pub use manifest::{PackageManifest, ScriptsOverlay, UnknownFields};
pub use profile::{Profile, ProfileSource};
pub use scaffold::{Reporter, ScaffoldReport, Scaffolder, SilentReporter, Step};

#[cfg(feature = "tui")]
pub use tui::run;
