//! Loading and saving the installation state file

use std::fs::File;
use std::io::Read;

use aos_fs::{ConfigStore, InstallPath, NormalizedPath, io};
use fs2::FileExt;

use super::{InstallationState, STATE_VERSION};
use crate::{Error, Result};

/// Outcome of reading the state file
#[derive(Debug, Clone)]
pub enum LoadedState {
    /// No state file: nothing was installed at this target
    Missing,
    /// A valid state file
    Loaded(InstallationState),
    /// A state file exists but cannot be trusted
    Corrupt { reason: String },
}

impl LoadedState {
    pub fn state(&self) -> Option<&InstallationState> {
        match self {
            Self::Loaded(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Reads and writes `<target>/.install-state.toml`
#[derive(Debug, Clone)]
pub struct StateStore {
    path: NormalizedPath,
    store: ConfigStore,
}

impl StateStore {
    /// State store for the installation rooted at `target_root`
    pub fn for_target(target_root: &NormalizedPath) -> Self {
        Self {
            path: target_root.join(InstallPath::StateFile.as_str()),
            store: ConfigStore::new(),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the state under a shared lock.
    ///
    /// Unparseable content, invalid UTF-8, or an unknown version yield
    /// [`LoadedState::Corrupt`] rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing state file cannot be opened,
    /// locked, or read.
    pub fn load(&self) -> Result<LoadedState> {
        let native = self.path.to_native();
        if !native.exists() {
            return Ok(LoadedState::Missing);
        }

        let file = File::open(&native).map_err(|e| aos_fs::Error::io(&native, e))?;
        file.lock_shared()
            .map_err(|_| aos_fs::Error::LockFailed {
                path: native.clone(),
            })?;

        // Read through the locked handle
        let mut bytes = Vec::new();
        (&file)
            .read_to_end(&mut bytes)
            .map_err(|e| aos_fs::Error::io(&native, e))?;

        let parsed = String::from_utf8(bytes)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                self.store
                    .parse::<InstallationState>(&self.path, &content)
                    .map_err(|e| e.to_string())
            })
            .and_then(|state| {
                if state.version() == STATE_VERSION {
                    Ok(state)
                } else {
                    Err(format!("unsupported state version {}", state.version()))
                }
            });

        match parsed {
            Ok(state) => Ok(LoadedState::Loaded(state)),
            Err(message) => {
                let err = Error::StateCorruption {
                    path: native,
                    message,
                };
                tracing::warn!(error = %err, "Treating every existing file as customized");
                Ok(LoadedState::Corrupt {
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Persist the state atomically under an exclusive lock.
    pub fn save(&self, state: &InstallationState) -> Result<()> {
        self.store.save(&self.path, state)?;
        Ok(())
    }

    /// Delete the state file. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        Ok(io::remove_file_if_exists(&self.path)?)
    }
}
