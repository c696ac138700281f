//! Installation report
//!
//! Pure aggregation over executed (or planned) actions.

use std::collections::BTreeMap;

use aos_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use super::action::{PlannedAction, SyncAction};
use crate::layer::LayerName;
use crate::state::Scope;

/// A logical path whose action could not be carried out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub logical_path: String,
    pub reason: String,
}

impl FileFailure {
    pub fn new(logical_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            logical_path: logical_path.into(),
            reason: reason.into(),
        }
    }
}

/// What happened (or would happen) to one logical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub logical_path: String,
    pub action: SyncAction,
    pub layer: Option<LayerName>,
    #[serde(default)]
    pub removed_upstream: bool,
    #[serde(default)]
    pub reconciled: bool,
    /// Backup written before overwriting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
}

impl ActionOutcome {
    pub fn with_backup(mut self, backup: Option<&NormalizedPath>) -> Self {
        self.backup = backup.map(|b| b.to_string());
        self
    }
}

impl From<&PlannedAction> for ActionOutcome {
    fn from(planned: &PlannedAction) -> Self {
        Self {
            logical_path: planned.logical_path.clone(),
            action: planned.action,
            layer: planned.layer(),
            removed_upstream: planned.removed_upstream,
            reconciled: planned.is_reconciled(),
            backup: None,
        }
    }
}

/// Summary of one sync run for the invoking collaborator
#[derive(Debug, Clone, Serialize)]
pub struct InstallationReport {
    pub target_root: String,
    pub scope: Scope,
    /// False for previews (`status`, `--dry-run`)
    pub applied: bool,
    /// The state file could not be parsed; existing files were kept
    pub state_corrupt: bool,
    /// Successful outcomes per action kind
    pub counts: BTreeMap<SyncAction, usize>,
    /// Customized files where upstream differs; need a manual merge
    pub requires_merge: Vec<String>,
    /// Files removed upstream but kept because they were customized
    pub retained_deletions: Vec<String>,
    /// Customized files whose content already matched upstream
    pub reconciled: Vec<String>,
    pub backups: Vec<String>,
    pub failures: Vec<FileFailure>,
    pub outcomes: Vec<ActionOutcome>,
}

impl InstallationReport {
    /// Aggregate outcomes into a report.
    pub fn from_outcomes(
        target_root: &NormalizedPath,
        scope: Scope,
        applied: bool,
        state_corrupt: bool,
        outcomes: Vec<ActionOutcome>,
        failures: Vec<FileFailure>,
    ) -> Self {
        let mut counts: BTreeMap<SyncAction, usize> =
            SyncAction::ALL.into_iter().map(|a| (a, 0)).collect();
        let mut requires_merge = Vec::new();
        let mut retained_deletions = Vec::new();
        let mut reconciled = Vec::new();
        let mut backups = Vec::new();

        for outcome in &outcomes {
            *counts.entry(outcome.action).or_default() += 1;

            if outcome.action == SyncAction::SkipCustomized {
                if outcome.removed_upstream {
                    retained_deletions.push(outcome.logical_path.clone());
                } else if outcome.reconciled {
                    reconciled.push(outcome.logical_path.clone());
                } else {
                    requires_merge.push(outcome.logical_path.clone());
                }
            }
            if let Some(backup) = &outcome.backup {
                backups.push(backup.clone());
            }
        }

        Self {
            target_root: target_root.to_string(),
            scope,
            applied,
            state_corrupt,
            counts,
            requires_merge,
            retained_deletions,
            reconciled,
            backups,
            failures,
            outcomes,
        }
    }

    pub fn count(&self, action: SyncAction) -> usize {
        self.counts.get(&action).copied().unwrap_or(0)
    }

    /// Number of outcomes that changed (or would change) the destination.
    pub fn changes(&self) -> usize {
        SyncAction::ALL
            .into_iter()
            .filter(|a| a.mutates())
            .map(|a| self.count(a))
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn outcome(&self, logical_path: &str) -> Option<&ActionOutcome> {
        self.outcomes.iter().find(|o| o.logical_path == logical_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outcome(path: &str, action: SyncAction) -> ActionOutcome {
        ActionOutcome {
            logical_path: path.to_string(),
            action,
            layer: Some(LayerName::Base),
            removed_upstream: false,
            reconciled: false,
            backup: None,
        }
    }

    #[test]
    fn counts_every_action_kind() {
        let report = InstallationReport::from_outcomes(
            &NormalizedPath::new("/target"),
            Scope::Base,
            true,
            false,
            vec![
                outcome("a.md", SyncAction::Create),
                outcome("b.md", SyncAction::Create),
                outcome("c.md", SyncAction::SkipUnmodified),
            ],
            Vec::new(),
        );

        assert_eq!(report.count(SyncAction::Create), 2);
        assert_eq!(report.count(SyncAction::SkipUnmodified), 1);
        assert_eq!(report.count(SyncAction::Delete), 0);
        assert_eq!(report.counts.len(), SyncAction::ALL.len());
        assert_eq!(report.changes(), 2);
    }

    #[test]
    fn splits_customized_paths_by_reason() {
        let mut removed = outcome("old.md", SyncAction::SkipCustomized);
        removed.removed_upstream = true;
        let mut same = outcome("same.md", SyncAction::SkipCustomized);
        same.reconciled = true;

        let report = InstallationReport::from_outcomes(
            &NormalizedPath::new("/target"),
            Scope::Project,
            true,
            false,
            vec![outcome("edited.md", SyncAction::SkipCustomized), removed, same],
            Vec::new(),
        );

        assert_eq!(report.requires_merge, vec!["edited.md".to_string()]);
        assert_eq!(report.retained_deletions, vec!["old.md".to_string()]);
        assert_eq!(report.reconciled, vec!["same.md".to_string()]);
        assert_eq!(report.count(SyncAction::SkipCustomized), 3);
    }

    #[test]
    fn serializes_counts_with_action_keys() {
        let report = InstallationReport::from_outcomes(
            &NormalizedPath::new("/target"),
            Scope::Base,
            false,
            false,
            vec![outcome("a.md", SyncAction::Create)],
            vec![FileFailure::new("b.md", "permission denied")],
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["counts"]["create"], 1);
        assert_eq!(json["counts"]["backup_and_overwrite"], 0);
        assert_eq!(json["failures"][0]["logical_path"], "b.md");
        assert_eq!(json["scope"], "base");
    }
}
