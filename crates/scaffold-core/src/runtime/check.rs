//! Detection of the command-line tools a profile's setup commands need

use crate::config::SetupCommands;
use crate::executor::system::platform_shell;
use anyhow::Result;
use std::process::{Command, Stdio};

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

/// `program --version` through the same shell the setup commands run in
fn version_command(program: &str) -> Command {
    let (shell, flag) = platform_shell();
    let mut cmd = Command::new(shell);
    cmd.arg(flag)
        .arg(format!("{} --version", program))
        .stdin(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Check whether `program --version` runs successfully
pub fn check_program(program: &str) -> ToolInfo {
    let output = version_command(program).output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            ToolInfo {
                name: program.to_string(),
                version: Some(version),
                available: true,
            }
        }
        _ => ToolInfo {
            name: program.to_string(),
            version: None,
            available: false,
        },
    }
}

/// Distinct programs invoked by the setup commands, in first-use order
pub fn required_programs(commands: &SetupCommands) -> Vec<String> {
    let mut programs: Vec<String> = Vec::new();
    for command in commands.all() {
        if let Some(program) = command.split_whitespace().next() {
            if !programs.iter().any(|p| p == program) {
                programs.push(program.to_string());
            }
        }
    }
    programs
}

/// Probe every required program; fails listing the ones that are missing
pub fn check_tools(commands: &SetupCommands) -> Result<Vec<ToolInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    for program in required_programs(commands) {
        let info = check_program(&program);
        if info.available {
            results.push(info);
        } else {
            missing.push(format!("{} ({})", program, install_hint(&program)));
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}

fn install_hint(program: &str) -> &'static str {
    match program {
        "npm" | "npx" | "node" => "install Node.js from https://nodejs.org",
        "yarn" => "install from https://yarnpkg.com",
        "pnpm" => "install from https://pnpm.io",
        "bun" | "bunx" => "install from https://bun.sh",
        _ => "make sure it is installed and on your PATH",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_programs_are_deduplicated() {
        let commands = SetupCommands {
            tooling: vec!["npm init @eslint/config".to_string()],
            ..SetupCommands::default()
        };
        assert_eq!(required_programs(&commands), ["npm", "npx"]);
    }

    #[test]
    fn test_version_check_goes_through_platform_shell() {
        let cmd = version_command("npm");
        let args: Vec<_> = cmd.get_args().collect();

        if cfg!(windows) {
            assert_eq!(cmd.get_program(), "cmd");
            assert_eq!(args, ["/C", "npm --version"]);
        } else {
            assert_eq!(cmd.get_program(), "sh");
            assert_eq!(args, ["-c", "npm --version"]);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_builtin_is_detected() {
        // `true` resolves inside the shell whether or not a binary exists on PATH
        let info = check_program("true");
        assert!(info.available);
        assert_eq!(info.name, "true");
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let info = check_program("express-init-no-such-tool");
        assert!(!info.available);
        assert!(info.version.is_none());
    }

    #[test]
    fn test_check_tools_lists_missing_programs() {
        let commands = SetupCommands {
            init: "express-init-no-such-tool init".to_string(),
            install_runtime: "express-init-no-such-tool add".to_string(),
            install_dev: "express-init-no-such-tool add -D".to_string(),
            compiler_init: "express-init-other-missing --init".to_string(),
            tooling: Vec::new(),
        };

        let err = check_tools(&commands).unwrap_err().to_string();
        assert!(err.contains("express-init-no-such-tool"));
        assert!(err.contains("express-init-other-missing"));
        assert_eq!(err.matches("express-init-no-such-tool").count(), 1);
    }
}
