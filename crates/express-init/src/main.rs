//! express-init - Project scaffolding for Express + TypeScript web services

use anyhow::Result;
use clap::{Parser, Subcommand};
use scaffold_core::tui::CreateArgs;
use std::path::PathBuf;

/// CLI version - compared against each profile's `min_cli_version`
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "express-init")]
#[command(about = "CLI for scaffolding Express + TypeScript web services")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision a new project
    Create(CliCreateArgs),
    /// List the built-in profiles
    ListProfiles,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Built-in profile to use (see `list-profiles`)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Directory containing a profile.yaml and its templates
    #[arg(long = "profile-dir", conflicts_with = "profile")]
    pub profile_dir: Option<PathBuf>,

    /// Project directory to provision (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Port written to .env and used as the server's fallback
    #[arg(long)]
    pub port: Option<u16>,

    /// Keep package.json fields that are normally dropped when scripts are added
    #[arg(long = "keep-unknown-fields")]
    pub keep_unknown_fields: bool,

    /// Skip the package manager / compiler availability check
    #[arg(long = "skip-checks")]
    pub skip_checks: bool,

    /// Hide package manager output unless a command fails
    #[arg(short, long)]
    pub quiet: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            profile: args.profile,
            profile_dir: args.profile_dir,
            directory: args.directory,
            port: args.port,
            keep_unknown_fields: args.keep_unknown_fields,
            skip_checks: args.skip_checks,
            quiet: args.quiet,
            yes: args.yes,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    match args.command {
        Some(Command::ListProfiles) => scaffold_core::profile::print_builtin_profiles(),
        Some(Command::Create(create_args)) => create(create_args.into()).await,
        // No subcommand provided, default to create behavior (interactive mode)
        None => create(CreateArgs::default()).await,
    }
}

async fn create(args: CreateArgs) -> Result<()> {
    let result = scaffold_core::run(args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
