//! Sync actions and plans

use std::fmt;

use aos_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use super::report::{ActionOutcome, FileFailure, InstallationReport};
use crate::layer::LayerName;
use crate::resolver::FileEntry;
use crate::state::{InstallationState, InstalledFile};

/// Decision for one logical path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// Write a file that is absent at the destination
    Create,
    /// Replace an untouched file with a newer upstream version
    Overwrite,
    /// Upstream and destination already agree
    SkipUnmodified,
    /// The destination was edited locally and is left alone
    SkipCustomized,
    /// Back up a customized file, then overwrite it (force mode only)
    BackupAndOverwrite,
    /// Remove an untouched file that no layer ships any more
    Delete,
}

impl SyncAction {
    pub const ALL: [SyncAction; 6] = [
        SyncAction::Create,
        SyncAction::Overwrite,
        SyncAction::SkipUnmodified,
        SyncAction::SkipCustomized,
        SyncAction::BackupAndOverwrite,
        SyncAction::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Overwrite => "overwrite",
            Self::SkipUnmodified => "skip_unmodified",
            Self::SkipCustomized => "skip_customized",
            Self::BackupAndOverwrite => "backup_and_overwrite",
            Self::Delete => "delete",
        }
    }

    /// Whether applying this action touches the destination tree.
    pub fn mutates(self) -> bool {
        matches!(
            self,
            Self::Create | Self::Overwrite | Self::BackupAndOverwrite | Self::Delete
        )
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified logical path, ready for execution
#[derive(Debug, Clone)]
pub struct PlannedAction {
    pub logical_path: String,
    pub action: SyncAction,
    /// Resolved upstream entry; `None` for paths removed upstream
    pub entry: Option<FileEntry>,
    pub destination: NormalizedPath,
    /// State record from the previous run
    pub recorded: Option<InstalledFile>,
    /// Checksum of the destination at planning time
    pub live_checksum: Option<String>,
    /// No current layer ships this path
    pub removed_upstream: bool,
}

impl PlannedAction {
    /// Layer the decision is attributed to.
    pub fn layer(&self) -> Option<LayerName> {
        self.entry
            .as_ref()
            .map(|e| e.source_layer)
            .or_else(|| self.recorded.as_ref().map(|r| r.layer))
    }

    /// A customized file whose content already equals upstream.
    ///
    /// Nothing needs merging; the executor re-records the checksum so the
    /// next run sees the file as unmodified.
    pub fn is_reconciled(&self) -> bool {
        self.action == SyncAction::SkipCustomized
            && !self.removed_upstream
            && match (&self.entry, &self.live_checksum) {
                (Some(entry), Some(live)) => &entry.checksum == live,
                _ => false,
            }
    }

    /// An unmodified file whose state record is missing or names another layer.
    pub fn needs_record(&self) -> bool {
        self.action == SyncAction::SkipUnmodified
            && match (&self.entry, &self.recorded) {
                (Some(_), None) => true,
                (Some(entry), Some(recorded)) => recorded.layer != entry.source_layer,
                (None, _) => false,
            }
    }
}

/// Every decision for one run, plus the state it starts from
#[derive(Debug, Clone)]
pub struct Plan {
    pub target_root: NormalizedPath,
    /// Resolved entries in logical-path order, then removals
    pub actions: Vec<PlannedAction>,
    /// Paths that could not be classified
    pub failures: Vec<FileFailure>,
    /// State the executor mutates and persists
    pub state: InstallationState,
    pub state_corrupt: bool,
    /// The state file is missing, corrupt, or records another scope, tool set, or team layer
    pub state_stale: bool,
}

impl Plan {
    pub fn action_for(&self, logical_path: &str) -> Option<&PlannedAction> {
        self.actions.iter().find(|a| a.logical_path == logical_path)
    }

    /// Whether applying the plan would touch the destination tree.
    pub fn has_changes(&self) -> bool {
        self.actions.iter().any(|a| a.action.mutates())
    }

    /// Report of what applying the plan would do, without doing it.
    pub fn preview(&self) -> InstallationReport {
        InstallationReport::from_outcomes(
            &self.target_root,
            self.state.scope,
            false,
            self.state_corrupt,
            self.actions.iter().map(ActionOutcome::from).collect(),
            self.failures.clone(),
        )
    }
}
