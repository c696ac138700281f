//! Classification of resolved files against state and the live tree

use aos_fs::checksum::probe_file_checksum;
use aos_fs::{NormalizedPath, validate_logical_path};

use super::action::{Plan, PlannedAction, SyncAction};
use super::report::FileFailure;
use crate::resolver::ResolvedSet;
use crate::state::{InstallationState, LoadedState};

/// Decides one [`SyncAction`] per logical path.
///
/// Classification never overwrites content it cannot prove was installed
/// unmodified; `force` only turns such cases into a backup followed by an
/// overwrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    force: bool,
}

impl DiffEngine {
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    pub fn force(&self) -> bool {
        self.force
    }

    /// Classify a path that some layer still ships.
    pub fn classify(
        &self,
        recorded: Option<&str>,
        live: Option<&str>,
        source: &str,
        state_corrupt: bool,
    ) -> SyncAction {
        let Some(live) = live else {
            return SyncAction::Create;
        };

        if state_corrupt {
            return self.customized(live, source);
        }

        match recorded {
            None if live == source => SyncAction::SkipUnmodified,
            None => self.customized(live, source),
            Some(recorded) if live != recorded => self.customized(live, source),
            Some(recorded) if source == recorded => SyncAction::SkipUnmodified,
            Some(_) => SyncAction::Overwrite,
        }
    }

    /// Classify a recorded path that no layer ships any more.
    ///
    /// Force never deletes a customized file.
    pub fn classify_removed(&self, recorded: &str, live: Option<&str>) -> SyncAction {
        match live {
            None => SyncAction::Delete,
            Some(live) if live == recorded => SyncAction::Delete,
            Some(_) => SyncAction::SkipCustomized,
        }
    }

    fn customized(&self, live: &str, source: &str) -> SyncAction {
        if self.force && live != source {
            SyncAction::BackupAndOverwrite
        } else {
            SyncAction::SkipCustomized
        }
    }

    /// Plan every action for `resolved` against the loaded state and the
    /// live files under `target_root`.
    ///
    /// `selection` is the empty state a fresh installation with this run's
    /// scope, tools, and team layer would start from.
    ///
    /// Live files that cannot be read become failures of the plan instead
    /// of being classified.
    pub fn plan(
        &self,
        resolved: ResolvedSet,
        loaded: LoadedState,
        selection: InstallationState,
        target_root: NormalizedPath,
    ) -> Plan {
        let state_corrupt = loaded.is_corrupt();
        let (state, state_stale) = match loaded {
            LoadedState::Loaded(mut state) => {
                let stale = !state.same_selection(&selection);
                state.scope = selection.scope;
                state.tools = selection.tools;
                state.team = selection.team;
                (state, stale)
            }
            LoadedState::Missing | LoadedState::Corrupt { .. } => (selection, true),
        };

        let mut actions = Vec::with_capacity(resolved.entries.len() + resolved.removed.len());
        let mut failures = Vec::new();

        for entry in resolved.entries {
            let live = match probe_file_checksum(&entry.destination.to_native()) {
                Ok(live) => live,
                Err(e) => {
                    tracing::warn!(path = %entry.logical_path, error = %e, "Cannot read installed file");
                    failures.push(FileFailure::new(&entry.logical_path, e.to_string()));
                    continue;
                }
            };
            let recorded = state.get(&entry.logical_path).cloned();
            let action = self.classify(
                recorded.as_ref().map(|r| r.checksum.as_str()),
                live.as_deref(),
                &entry.checksum,
                state_corrupt,
            );
            tracing::debug!(path = %entry.logical_path, %action, "Classified");

            actions.push(PlannedAction {
                logical_path: entry.logical_path.clone(),
                action,
                destination: entry.destination.clone(),
                entry: Some(entry),
                recorded,
                live_checksum: live,
                removed_upstream: false,
            });
        }

        for logical_path in resolved.removed {
            if let Err(message) = validate_logical_path(&logical_path) {
                failures.push(FileFailure::new(&logical_path, message));
                continue;
            }
            let Some(recorded) = state.get(&logical_path).cloned() else {
                continue;
            };
            let destination = target_root.join(&logical_path);
            let live = match probe_file_checksum(&destination.to_native()) {
                Ok(live) => live,
                Err(e) => {
                    tracing::warn!(path = %logical_path, error = %e, "Cannot read installed file");
                    failures.push(FileFailure::new(&logical_path, e.to_string()));
                    continue;
                }
            };
            let action = self.classify_removed(&recorded.checksum, live.as_deref());
            tracing::debug!(path = %logical_path, %action, "Classified removal");

            actions.push(PlannedAction {
                logical_path,
                action,
                entry: None,
                destination,
                recorded: Some(recorded),
                live_checksum: live,
                removed_upstream: true,
            });
        }

        Plan {
            target_root,
            actions,
            failures,
            state,
            state_corrupt,
            state_stale,
        }
    }
}
