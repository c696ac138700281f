//! Sync, status, and reset command implementations
//!
//! These commands work on an existing installation and reuse the tool
//! selection recorded in its state file.

use aos_core::{InstallLocations, Scope, SyncEngine, SyncSettings};
use colored::Colorize;

use super::install::RunOptions;
use super::render;
use crate::error::Result;

/// Run the sync command
///
/// Refreshes the installation of `scope` from its layers.
pub fn run_sync(locations: &InstallLocations, scope: Scope, options: RunOptions) -> Result<()> {
    let settings = SyncSettings::resume(scope, locations)?
        .with_force(options.force)
        .with_dry_run(options.dry_run);

    if !options.json {
        println!(
            "{} Synchronizing {}...",
            "=>".blue().bold(),
            settings.target_root
        );
    }

    let report = SyncEngine::new(settings).sync()?;
    render::finish(&report, options.json)
}

/// Run the status command
///
/// Shows what a sync would do without touching the installation.
pub fn run_status(locations: &InstallLocations, scope: Scope, json: bool) -> Result<()> {
    let settings = SyncSettings::resume(scope, locations)?;

    if !json {
        println!(
            "{} Checking {}...",
            "=>".blue().bold(),
            settings.target_root
        );
    }

    let report = SyncEngine::new(settings).status()?;
    render::finish(&report, json)
}

/// Run the reset command
///
/// Deletes the installation state. Installed files stay in place and are
/// adopted or treated as edited by the next install.
pub fn run_reset(locations: &InstallLocations, scope: Scope) -> Result<()> {
    let engine = SyncEngine::new(SyncSettings::for_scope(scope, locations));

    if engine.reset()? {
        println!(
            "{} Removed {}",
            "OK".green().bold(),
            engine.state_store().path()
        );
    } else {
        println!(
            "{} No installation state at {}",
            "OK".green().bold(),
            engine.state_store().path()
        );
    }
    Ok(())
}
