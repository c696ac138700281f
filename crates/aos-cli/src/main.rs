//! Agent OS installer CLI
//!
//! Installs and refreshes layered AI coding standards, keeping local edits.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, scope_of};
use commands::install::RunOptions;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command.clone() else {
        println!("{} Agent OS installer", "agent-os".green().bold());
        println!();
        println!("Run {} for available commands.", "agent-os --help".cyan());
        return Ok(());
    };

    let locations = context::resolve_locations(&cli)?;
    execute_command(command, &locations)
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    if let Err(e) = result {
        eprintln!("{}: cannot install logger: {}", "warning".yellow().bold(), e);
    }
    if verbose {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands, locations: &aos_core::InstallLocations) -> Result<()> {
    match cmd {
        Commands::Install {
            target,
            tools,
            force,
            dry_run,
            json,
        } => commands::run_install(
            locations,
            target,
            &tools,
            RunOptions {
                force,
                dry_run,
                json,
            },
        ),
        Commands::Sync {
            project,
            force,
            dry_run,
            json,
        } => commands::run_sync(
            locations,
            scope_of(project),
            RunOptions {
                force,
                dry_run,
                json,
            },
        ),
        Commands::Status { project, json } => commands::run_status(locations, scope_of(project), json),
        Commands::Diff { project } => commands::run_diff(locations, scope_of(project)),
        Commands::Reset { project } => commands::run_reset(locations, scope_of(project)),
    }
}
