//! Install location resolution
//!
//! Turns the global path flags (and their environment overrides) into the
//! absolute locations an invocation works with.

use std::path::{Path, PathBuf};

use aos_core::InstallLocations;
use aos_fs::{InstallPath, NormalizedPath};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Resolve every location from the parsed command line.
pub fn resolve_locations(cli: &Cli) -> Result<InstallLocations> {
    let cwd = std::env::current_dir()?;

    let home = match &cli.home {
        Some(home) => home.clone(),
        None => dirs::home_dir()
            .map(|h| h.join(InstallPath::HomeInstallDir.as_str()))
            .ok_or_else(|| CliError::user("Cannot determine the home directory; pass --home"))?,
    };

    let locations = InstallLocations {
        home: absolute(&cwd, &home),
        base_source: absolute(&cwd, cli.source.as_deref().unwrap_or(&cwd)),
        team_source: cli.team.as_deref().map(|team| absolute(&cwd, team)),
        project_dir: absolute(&cwd, cli.project_dir.as_deref().unwrap_or(&cwd)),
    };
    tracing::debug!(?locations, "Resolved install locations");
    Ok(locations)
}

/// Absolute, canonical where the path exists.
fn absolute(cwd: &Path, path: &Path) -> NormalizedPath {
    let joined: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    NormalizedPath::new(dunce::canonicalize(&joined).unwrap_or(joined))
}
