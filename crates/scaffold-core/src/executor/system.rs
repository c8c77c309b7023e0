//! Real backends: shell-spawned processes and the local filesystem

use super::{CommandOutcome, CommandRunner, FileSystem, StdioMode};
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command as TokioCommand;

/// Runs commands through the platform shell, like a user typing them
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

/// Shell program and its "run this string" flag for the current platform.
/// Anything that needs to resolve tools the way `SystemRunner` does (for
/// example `npm.cmd` on Windows) must go through the same shell.
pub(crate) fn platform_shell() -> (&'static str, &'static str) {
    if cfg!(windows) {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

impl SystemRunner {
    fn shell(command: &str) -> TokioCommand {
        let (shell, flag) = platform_shell();
        let mut cmd = TokioCommand::new(shell);
        cmd.arg(flag).arg(command);
        cmd
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &str, cwd: &Path, stdio: StdioMode) -> io::Result<CommandOutcome> {
        let mut cmd = Self::shell(command);
        cmd.current_dir(cwd);

        match stdio {
            StdioMode::Inherit => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await?;

                Ok(CommandOutcome {
                    code: status.code(),
                    success: status.success(),
                    stdout: None,
                    stderr: None,
                })
            }
            StdioMode::Capture => {
                let output = cmd.stdin(Stdio::null()).output().await?;

                Ok(CommandOutcome {
                    code: output.status.code(),
                    success: output.status.success(),
                    stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
                    stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
                })
            }
        }
    }
}

/// Local filesystem via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path).await
    }

    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path).await
    }
}
