//! Applying a plan to the target tree

use aos_fs::{NormalizedPath, io};

use super::action::{Plan, PlannedAction, SyncAction};
use super::report::{ActionOutcome, FileFailure, InstallationReport};
use crate::backup::BackupManager;
use crate::resolver::FileEntry;
use crate::state::{InstallationState, StateStore};
use crate::{Error, Result};

/// Executes planned actions one file at a time.
///
/// A failure on one file is recorded in the report and the batch continues.
/// The state file is persisted as the last step of every action, so an
/// interrupted run leaves state that the next run reconciles.
#[derive(Debug, Clone)]
pub struct SyncExecutor {
    store: StateStore,
    backups: BackupManager,
}

impl SyncExecutor {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            backups: BackupManager::new(),
        }
    }

    pub fn with_backups(mut self, backups: BackupManager) -> Self {
        self.backups = backups;
        self
    }

    /// Apply every action of `plan`.
    ///
    /// # Errors
    ///
    /// Returns an error only if a missing, corrupt, or outdated state file
    /// cannot be written before the first action. Per-file errors are
    /// reported in [`InstallationReport::failures`].
    pub fn apply(&self, plan: Plan) -> Result<InstallationReport> {
        let Plan {
            target_root,
            actions,
            mut failures,
            mut state,
            state_corrupt,
            state_stale,
        } = plan;

        if state_stale {
            self.store.save(&state)?;
            tracing::debug!(path = %self.store.path(), "Wrote installation state");
        }

        let mut outcomes = Vec::with_capacity(actions.len());
        for planned in &actions {
            match self.execute(planned, &mut state) {
                Ok(backup) => {
                    if planned.action.mutates() {
                        tracing::info!(
                            path = %planned.logical_path,
                            action = %planned.action,
                            "Applied"
                        );
                    }
                    outcomes.push(ActionOutcome::from(planned).with_backup(backup.as_ref()));
                }
                Err(e) => {
                    tracing::warn!(path = %planned.logical_path, error = %e, "Failed to apply");
                    failures.push(FileFailure::new(&planned.logical_path, e.to_string()));
                }
            }
        }

        Ok(InstallationReport::from_outcomes(
            &target_root,
            state.scope,
            true,
            state_corrupt,
            outcomes,
            failures,
        ))
    }

    fn execute(
        &self,
        planned: &PlannedAction,
        state: &mut InstallationState,
    ) -> Result<Option<NormalizedPath>> {
        match planned.action {
            SyncAction::Create | SyncAction::Overwrite => {
                let entry = upstream(planned)?;
                io::write_atomic(&planned.destination, &entry.content)?;
                self.record(state, entry)?;
                Ok(None)
            }
            SyncAction::BackupAndOverwrite => {
                let entry = upstream(planned)?;
                let backup = self.backups.backup(&planned.destination)?;
                io::write_atomic(&planned.destination, &entry.content)?;
                self.record(state, entry)?;
                Ok(Some(backup))
            }
            SyncAction::SkipUnmodified if planned.needs_record() => {
                self.record(state, upstream(planned)?)?;
                Ok(None)
            }
            SyncAction::SkipCustomized if planned.is_reconciled() => {
                tracing::debug!(path = %planned.logical_path, "Customized file matches upstream");
                self.record(state, upstream(planned)?)?;
                Ok(None)
            }
            SyncAction::SkipUnmodified | SyncAction::SkipCustomized => Ok(None),
            SyncAction::Delete => {
                if !io::remove_file_if_exists(&planned.destination)? {
                    tracing::debug!(path = %planned.logical_path, "Already removed");
                }
                if state.forget(&planned.logical_path).is_some() {
                    self.store.save(state)?;
                }
                Ok(None)
            }
        }
    }

    fn record(&self, state: &mut InstallationState, entry: &FileEntry) -> Result<()> {
        state.record(&entry.logical_path, entry.source_layer, entry.checksum.clone());
        self.store.save(state)
    }
}

fn upstream(planned: &PlannedAction) -> Result<&FileEntry> {
    planned.entry.as_ref().ok_or_else(|| Error::InvalidPath {
        message: format!("no upstream entry for {}", planned.logical_path),
    })
}
