//! Recording test doubles for the executor backends

use super::{CommandOutcome, CommandRunner, FileSystem, StdioMode};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every command instead of spawning it.
///
/// Commands registered with `fail_on` report a non-zero exit; commands
/// registered with `writes` drop a file into the working directory, which
/// lets tests stand in for tools like `npm init`.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(String, PathBuf)>>,
    failures: Vec<(String, i32)>,
    effects: Vec<(String, String, String)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, command: &str, code: i32) -> Self {
        self.failures.push((command.to_string(), code));
        self
    }

    pub fn writes(mut self, command: &str, path: &str, content: &str) -> Self {
        self.effects
            .push((command.to_string(), path.to_string(), content.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    pub fn cwds(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cwd)| cwd.clone())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str, cwd: &Path, _stdio: StdioMode) -> io::Result<CommandOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));

        if let Some((_, code)) = self.failures.iter().find(|(c, _)| c == command) {
            return Ok(CommandOutcome::failed(*code));
        }

        for (_, path, content) in self.effects.iter().filter(|(c, _, _)| c == command) {
            std::fs::write(cwd.join(path), content)?;
        }

        Ok(CommandOutcome::succeeded())
    }
}

/// In-memory filesystem that records each call
#[derive(Debug, Default)]
pub struct RecordingFs {
    calls: Mutex<Vec<String>>,
    dirs: Mutex<HashSet<PathBuf>>,
    files: Mutex<HashMap<PathBuf, String>>,
}

impl RecordingFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &str, path: &Path) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", op, path.display()));
    }
}

impl FileSystem for RecordingFs {
    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.record("create_dir", path);
        if !self.dirs.lock().unwrap().insert(path.to_path_buf()) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        Ok(())
    }

    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.record("write", path);
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.record("read", path);
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}
