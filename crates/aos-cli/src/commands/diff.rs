//! Diff command implementation
//!
//! Shows, for every locally edited file whose upstream version changed, a
//! unified diff from the installed file to upstream.

use aos_core::{InstallLocations, Scope, SyncEngine, SyncSettings};
use colored::Colorize;

use crate::error::Result;

/// Run the diff command
pub fn run_diff(locations: &InstallLocations, scope: Scope) -> Result<()> {
    let engine = SyncEngine::new(SyncSettings::resume(scope, locations)?);
    let hints = engine.merge_hints()?;

    if hints.is_empty() {
        println!(
            "{} No files require a manual merge.",
            "OK".green().bold()
        );
        return Ok(());
    }

    for hint in &hints {
        println!(
            "{} {} ({})",
            "MERGE".yellow().bold(),
            hint.logical_path.cyan(),
            hint.layer
        );
        for line in hint.diff.lines() {
            print_diff_line(line);
        }
        println!();
    }
    Ok(())
}

fn print_diff_line(line: &str) {
    if line.starts_with("+++") || line.starts_with("---") {
        println!("{}", line.bold());
    } else if line.starts_with("@@") {
        println!("{}", line.cyan());
    } else if line.starts_with('+') {
        println!("{}", line.green());
    } else if line.starts_with('-') {
        println!("{}", line.red());
    } else {
        println!("{}", line);
    }
}
