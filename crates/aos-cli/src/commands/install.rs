//! Install command implementation

use aos_core::{InstallLocations, Scope, SyncEngine, SyncSettings, Tool};
use colored::Colorize;

use super::render;
use crate::error::{CliError, Result};

/// Options shared by install and sync
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub force: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Run the install command
///
/// Composes the layers of `scope` onto its target. Files edited locally are
/// kept unless `force` is set, in which case they are backed up first.
pub fn run_install(
    locations: &InstallLocations,
    scope: Scope,
    tools: &[Tool],
    options: RunOptions,
) -> Result<()> {
    if scope == Scope::Project && !locations.home.is_dir() {
        return Err(CliError::user(format!(
            "No base installation at {}. Run `agent-os install base` first.",
            locations.home
        )));
    }

    let settings = SyncSettings::for_scope(scope, locations)
        .with_tools(tools.iter().copied())
        .with_force(options.force)
        .with_dry_run(options.dry_run);

    if !options.json {
        println!(
            "{} Installing {} into {}...",
            "=>".blue().bold(),
            scope.to_string().cyan(),
            settings.target_root
        );
    }

    let report = SyncEngine::new(settings).sync()?;
    render::finish(&report, options.json)
}
