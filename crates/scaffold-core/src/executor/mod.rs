//! Scaffolding executor: the only boundary to processes and the filesystem
//!
//! This module provides:
//! - `CommandRunner` and `FileSystem` capability traits (real backends in `system`)
//! - `Executor`, which validates every argument before delegating to a backend
//!
//! Relative paths are resolved against the executor's project root and every
//! command runs with the project root as its working directory.

pub mod system;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::{ScaffoldError, ScaffoldResult};
use std::io;
use std::path::{Path, PathBuf};

pub use system::{LocalFs, SystemRunner};

/// How a spawned command's standard streams are wired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdioMode {
    /// Share the caller's terminal so tool output is visible live
    #[default]
    Inherit,
    /// Collect stdout and stderr into the outcome
    Capture,
}

/// Structured result of a finished external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub success: bool,
    /// Captured output, only populated in `StdioMode::Capture`
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl CommandOutcome {
    /// Outcome of a process that exited cleanly without captured output
    pub fn succeeded() -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: None,
            stderr: None,
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: None,
            stderr: None,
        }
    }
}

/// Spawns external commands and blocks until they exit
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &str, cwd: &Path, stdio: StdioMode) -> io::Result<CommandOutcome>;
}

/// Raw filesystem access used by the executor
#[allow(async_fn_in_trait)]
pub trait FileSystem {
    /// Create a single directory; fails if it already exists
    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Create or fully replace a file
    async fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Validated access to the four scaffolding primitives
#[derive(Debug, Clone)]
pub struct Executor<R = SystemRunner, F = LocalFs> {
    root: PathBuf,
    runner: R,
    fs: F,
    stdio: StdioMode,
}

impl Executor {
    /// Create an executor backed by real processes and the local filesystem
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_backends(root, SystemRunner, LocalFs)
    }
}

impl<R: CommandRunner, F: FileSystem> Executor<R, F> {
    /// Create an executor with custom backends (used by tests)
    pub fn with_backends(root: impl Into<PathBuf>, runner: R, fs: F) -> Self {
        Self {
            root: root.into(),
            runner,
            fs,
            stdio: StdioMode::Inherit,
        }
    }

    /// Change how command output is wired (defaults to `Inherit`).
    /// With `Capture`, a failing command's stderr travels in its error.
    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// Project root that paths and commands are relative to
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    #[cfg(test)]
    pub(crate) fn fs(&self) -> &F {
        &self.fs
    }

    /// Resolve a primitive's path argument against the project root
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Run `command` in the project root and wait for it to exit
    pub async fn run_command(&self, command: &str) -> ScaffoldResult<CommandOutcome> {
        require_non_empty(command, "command must not be empty")?;

        let outcome = self
            .runner
            .run(command, &self.root, self.stdio)
            .await
            .map_err(|source| ScaffoldError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !outcome.success {
            return Err(ScaffoldError::ExternalCommandFailed {
                command: command.to_string(),
                code: outcome.code,
                stderr: outcome.stderr,
            });
        }

        Ok(outcome)
    }

    /// Create exactly one directory. Not idempotent: an existing directory is an error.
    pub async fn create_directory(&self, path: &str) -> ScaffoldResult<PathBuf> {
        require_non_empty(path, "directory path must not be empty")?;

        let full = self.resolve(path);
        self.fs
            .create_dir(&full)
            .await
            .map_err(|e| ScaffoldError::from_io(&full, e))?;
        Ok(full)
    }

    /// Create or fully overwrite a file with non-empty content
    pub async fn write_file(&self, path: &str, content: &str) -> ScaffoldResult<PathBuf> {
        require_non_empty(path, "file path must not be empty")?;
        require_non_empty(content, "file content must not be empty")?;

        let full = self.resolve(path);
        self.fs
            .write(&full, content)
            .await
            .map_err(|e| ScaffoldError::from_io(&full, e))?;
        Ok(full)
    }

    /// Read the whole file as UTF-8 text
    pub async fn read_file(&self, path: &str) -> ScaffoldResult<String> {
        require_non_empty(path, "file path must not be empty")?;

        let full = self.resolve(path);
        self.fs
            .read_to_string(&full)
            .await
            .map_err(|e| ScaffoldError::from_io(&full, e))
    }
}

fn require_non_empty(value: &str, message: &'static str) -> ScaffoldResult<()> {
    if value.is_empty() {
        return Err(ScaffoldError::InvalidArgument(message));
    }
    Ok(())
}
