//! SyncEngine implementation
//!
//! The SyncEngine ties the pipeline together for one target:
//! manifest reading per layer, layer resolution, classification against the
//! installation state, and execution.

use super::action::Plan;
use super::diff::DiffEngine;
use super::executor::SyncExecutor;
use super::merge::MergeHint;
use super::report::InstallationReport;
use crate::Result;
use crate::config::SyncSettings;
use crate::manifest::ManifestReader;
use crate::resolver::LayerResolver;
use crate::state::StateStore;

/// Engine for synchronizing a layered file set onto a target
///
/// The SyncEngine provides these main operations:
/// - **plan**: classify every file without touching the target
/// - **apply**: execute a plan
/// - **sync**: plan, then apply unless `dry_run` is set
/// - **status**: the report a sync would produce
/// - **reset**: forget the installation state
#[derive(Debug, Clone)]
pub struct SyncEngine {
    settings: SyncSettings,
    store: StateStore,
}

impl SyncEngine {
    pub fn new(settings: SyncSettings) -> Self {
        let store = StateStore::for_target(&settings.target_root);
        Self { settings, store }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn state_store(&self) -> &StateStore {
        &self.store
    }

    /// Classify every file of the composed layers.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be read (including a missing
    /// mandatory layer) or the state file cannot be opened. Nothing has been
    /// written to the target in that case.
    pub fn plan(&self) -> Result<Plan> {
        let loaded = self.store.load()?;
        let reader = ManifestReader::new(self.settings.tools());

        let mut layers = Vec::with_capacity(self.settings.layers().len());
        for layer in self.settings.layers() {
            let candidates = reader.read(layer)?;
            layers.push((layer.clone(), candidates));
        }

        let resolved = LayerResolver::new(self.settings.target_root.clone())
            .resolve(layers, loaded.state())?;
        tracing::debug!(
            files = resolved.len(),
            removed = resolved.removed.len(),
            "Resolved layers"
        );

        Ok(DiffEngine::new(self.settings.force).plan(
            resolved,
            loaded,
            self.settings.selection(),
            self.settings.target_root.clone(),
        ))
    }

    /// Execute `plan` against the target.
    pub fn apply(&self, plan: Plan) -> Result<InstallationReport> {
        SyncExecutor::new(self.store.clone()).apply(plan)
    }

    /// Plan and apply; with `dry_run` only the preview is returned.
    pub fn sync(&self) -> Result<InstallationReport> {
        let plan = self.plan()?;
        if self.settings.dry_run {
            tracing::info!(root = %self.settings.target_root, "Dry run - no changes made");
            return Ok(plan.preview());
        }
        self.apply(plan)
    }

    /// Report what a sync would do, without doing it.
    pub fn status(&self) -> Result<InstallationReport> {
        Ok(self.plan()?.preview())
    }

    /// Unified diffs for every file that requires a manual merge.
    pub fn merge_hints(&self) -> Result<Vec<MergeHint>> {
        Ok(MergeHint::collect(&self.plan()?))
    }

    /// Delete the installation state. Installed files are left in place.
    pub fn reset(&self) -> Result<bool> {
        let removed = self.store.reset()?;
        if removed {
            tracing::info!(path = %self.store.path(), "Removed installation state");
        }
        Ok(removed)
    }
}
