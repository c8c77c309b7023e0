//! Error taxonomy for the executor primitives and the provisioning routine

use std::io;
use std::path::{Path, PathBuf};

/// Result alias used by the executor and the provisioning routine
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Errors surfaced by the scaffolding executor and the provisioning routine.
///
/// `InvalidArgument` is always raised before anything touches a process or the
/// filesystem, so callers can tell malformed input apart from a rejection by
/// the outside world.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// Empty command, path or content passed to a primitive
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Spawned process exited unsuccessfully. `stderr` is only filled when
    /// the executor captures output instead of passing it through.
    #[error("command `{command}` failed with {}", describe_exit(.code))]
    ExternalCommandFailed {
        command: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// Process could not be started at all
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{} already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Progress could not be written to the terminal
    #[error("failed to report progress: {0}")]
    Report(#[source] io::Error),

    /// The package manifest could not be parsed or re-serialized
    #[error("malformed manifest {}: {source}", .path.display())]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ScaffoldError {
    /// Classify a filesystem error by its kind
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AlreadyExists => Self::AlreadyExists {
                path: path.to_path_buf(),
            },
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
