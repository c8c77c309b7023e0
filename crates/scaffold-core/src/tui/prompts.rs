//! Charm-style CLI prompts using cliclack

use crate::error::ScaffoldError;
use crate::executor::{Executor, StdioMode};
use crate::manifest::UnknownFields;
use crate::profile::{self, Profile, ProfileSource, BUILTIN_PROFILES};
use crate::runtime::check;
use crate::scaffold::{Reporter, Scaffolder, Step};
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Shown in version warnings
const UPGRADE_COMMAND: &str = "cargo install express-init --force";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Built-in profile key
    pub profile: Option<String>,

    /// Local profile directory (takes precedence over `profile`)
    pub profile_dir: Option<PathBuf>,

    /// Project directory to provision
    pub directory: Option<PathBuf>,

    /// Port written to the environment file and templates
    pub port: Option<u16>,

    /// Keep package.json fields outside the canonical set
    pub keep_unknown_fields: bool,

    /// Skip the package manager / compiler availability check
    pub skip_checks: bool,

    /// Hide tool output unless a command fails
    pub quiet: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl CreateArgs {
    /// How setup command output reaches the terminal
    pub fn stdio(&self) -> StdioMode {
        if self.quiet {
            StdioMode::Capture
        } else {
            StdioMode::Inherit
        }
    }
}

/// Logs each provisioning step as a cliclack step line
struct TuiReporter;

impl Reporter for TuiReporter {
    fn step_started(&self, step: Step) -> io::Result<()> {
        cliclack::log::step(step.description())
    }

    fn step_skipped(&self, step: Step, reason: &str) -> io::Result<()> {
        cliclack::log::remark(format!("{} skipped: {}", step.description(), reason))
    }
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro("express-init")?;

    // Step 1: Pick and load a profile
    let source = select_profile(&args)?;
    let profile = load_profile(&source)?;

    if let Some(min_version) = &profile.manifest.min_cli_version {
        if let Some(warning) =
            profile::check_compatibility(cli_version, min_version, UPGRADE_COMMAND)
        {
            cliclack::log::warning(format!(
                "Version warning: {}",
                warning.lines().next().unwrap_or(&warning)
            ))?;
        }
    }

    // Step 2: Select directory
    let project_dir = select_directory(&args)?;

    // Step 3: Select port
    let port = select_port(&profile, &args)?;

    // Step 4: Check tools
    if args.skip_checks {
        cliclack::log::info("Skipping tool check")?;
    } else {
        check_tools(&profile)?;
    }

    // Step 5: Provision
    create_project(&profile, &project_dir, port, &args).await?;

    // Step 6: Show next steps
    print_next_steps(&profile, &project_dir)?;

    Ok(())
}

fn select_profile(args: &CreateArgs) -> Result<ProfileSource> {
    if let Some(dir) = &args.profile_dir {
        return Ok(ProfileSource::local(dir.clone()));
    }
    if let Some(key) = &args.profile {
        return ProfileSource::builtin(key);
    }
    if std::env::var_os(profile::PROFILE_DIR_ENV).is_some() || args.yes {
        return ProfileSource::from_env();
    }

    // Build select prompt from every built-in profile's manifest
    let mut select = cliclack::select("Select a profile");
    for builtin in BUILTIN_PROFILES {
        let loaded = ProfileSource::Builtin(builtin).load()?;
        select = select.item(
            builtin.key,
            loaded.manifest.name,
            loaded.manifest.description,
        );
    }
    let key: &str = select.interact()?;

    ProfileSource::builtin(key)
}

fn load_profile(source: &ProfileSource) -> Result<Profile> {
    let spinner = cliclack::spinner();
    spinner.start("Loading profile...");

    match source.load() {
        Ok(profile) => {
            spinner.stop(format!(
                "Profile: {} - {}",
                profile.manifest.name, profile.manifest.description
            ));
            Ok(profile)
        }
        Err(e) => {
            spinner.stop(format!("Failed to load {}", source.describe()));
            Err(e)
        }
    }
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Use --directory flag if provided
    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(".")
            .default_input(".")
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files
    if path.exists() && path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                // Auto-confirm with --yes flag
                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(false)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn select_port(profile: &Profile, args: &CreateArgs) -> Result<u16> {
    if let Some(port) = args.port {
        return Ok(port);
    }
    if args.yes {
        return Ok(profile.manifest.port);
    }

    let default = profile.manifest.port.to_string();
    let input: String = cliclack::input("Server port")
        .placeholder(&default)
        .default_input(&default)
        .validate(|input: &String| {
            if input.parse::<u16>().is_ok() {
                Ok(())
            } else {
                Err("Enter a port between 0 and 65535")
            }
        })
        .interact()?;

    input
        .parse()
        .with_context(|| format!("Invalid port: {}", input))
}

fn check_tools(profile: &Profile) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");

    match check::check_tools(&profile.manifest.commands) {
        Ok(tools) => {
            let info: Vec<String> = tools
                .iter()
                .map(|t| format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown")))
                .collect();
            spinner.stop(format!("Detected tools: {}", info.join(", ")));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Missing tools");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing tools and try again.");
        }
    }
}

async fn create_project(
    profile: &Profile,
    project_dir: &Path,
    port: u16,
    args: &CreateArgs,
) -> Result<()> {
    tokio::fs::create_dir_all(project_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

    let config = profile.to_config(
        Some(port),
        UnknownFields::from_keep_flag(args.keep_unknown_fields),
    );
    let executor = Executor::new(project_dir).stdio(args.stdio());

    match Scaffolder::new(&executor, &TuiReporter).run(&config).await {
        Ok(report) => {
            cliclack::log::success(format!(
                "Created {} files in {}",
                report.files.len(),
                project_dir.display()
            ))?;
            Ok(())
        }
        Err(e) => {
            if let ScaffoldError::ExternalCommandFailed {
                stderr: Some(stderr),
                ..
            } = &e
            {
                if !stderr.trim().is_empty() {
                    cliclack::log::error(stderr.trim())?;
                }
            }
            cliclack::log::warning("Steps that already completed were left in place")?;
            Err(e).context("Provisioning failed")
        }
    }
}

fn print_next_steps(profile: &Profile, project_dir: &Path) -> Result<()> {
    let mut steps = Vec::new();
    let current = std::env::current_dir().ok();

    // cd to directory if not current
    if current.as_deref() != Some(project_dir) {
        steps.push(format!("cd {}", project_dir.display()));
    }
    steps.extend(profile.manifest.next_steps.iter().cloned());

    println!();
    println!("  {}", console::style("Next steps").bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
