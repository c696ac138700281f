//! Install locations and per-run settings
//!
//! Locations come from the command line and environment; settings compose
//! them with a scope into the layers and target of one run:
//!
//! | scope     | layers (ascending precedence)                 | target                  |
//! |-----------|-----------------------------------------------|-------------------------|
//! | `base`    | base source                                   | user-level home         |
//! | `project` | user-level home, team, `<project>/.agent-os.local` | `<project>/.agent-os` |

use aos_fs::{InstallPath, NormalizedPath};

use crate::layer::{LayerDescriptor, LayerName, Tool};
use crate::state::{InstallationState, LoadedState, Scope, StateStore};
use crate::{Error, Result};

/// Filesystem locations an invocation works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLocations {
    /// User-level installation (target of `base`, base layer of `project`)
    pub home: NormalizedPath,
    /// Shipped base layer, installed into `home`
    pub base_source: NormalizedPath,
    /// Optional team layer
    pub team_source: Option<NormalizedPath>,
    /// Project the `project` scope installs into
    pub project_dir: NormalizedPath,
}

impl InstallLocations {
    pub fn project_target(&self) -> NormalizedPath {
        self.project_dir.join(InstallPath::ProjectInstallDir.as_str())
    }

    /// Project-local layer source
    pub fn project_layer(&self) -> NormalizedPath {
        self.project_dir.join(InstallPath::ProjectLayerDir.as_str())
    }

    pub fn target_for(&self, scope: Scope) -> NormalizedPath {
        match scope {
            Scope::Base => self.home.clone(),
            Scope::Project => self.project_target(),
        }
    }

    /// Layers composed for `scope`, in ascending precedence.
    pub fn layers_for(&self, scope: Scope) -> Vec<LayerDescriptor> {
        scope
            .layers()
            .iter()
            .filter_map(|&name| {
                let root = match (scope, name) {
                    (Scope::Base, LayerName::Base) => Some(self.base_source.clone()),
                    (Scope::Project, LayerName::Base) => Some(self.home.clone()),
                    (_, LayerName::Team) => self.team_source.clone(),
                    (_, LayerName::Project) => Some(self.project_layer()),
                };
                root.map(|root| LayerDescriptor::new(name, root))
            })
            .collect()
    }
}

/// Everything one sync run needs
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub scope: Scope,
    pub target_root: NormalizedPath,
    layers: Vec<LayerDescriptor>,
    tools: Vec<Tool>,
    team: Option<NormalizedPath>,
    /// Back up and overwrite customized files
    pub force: bool,
    /// Plan and report without touching the target
    pub dry_run: bool,
}

impl SyncSettings {
    /// Settings for a fresh install of `scope`.
    pub fn for_scope(scope: Scope, locations: &InstallLocations) -> Self {
        Self {
            scope,
            target_root: locations.target_for(scope),
            layers: locations.layers_for(scope),
            tools: Vec::new(),
            team: match scope {
                Scope::Base => None,
                Scope::Project => locations.team_source.clone(),
            },
            force: false,
            dry_run: false,
        }
    }

    /// Settings for re-syncing an existing installation of `scope`.
    ///
    /// Tools are taken from the installation state, and so is the team
    /// layer unless `locations` names one. A corrupt state keeps the
    /// settings given here and selects no tools.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInstalled`] if the target has no state file.
    pub fn resume(scope: Scope, locations: &InstallLocations) -> Result<Self> {
        let target_root = locations.target_for(scope);
        let store = StateStore::for_target(&target_root);

        match store.load()? {
            LoadedState::Missing => Err(Error::NotInstalled {
                path: target_root.to_native(),
            }),
            LoadedState::Loaded(state) => {
                tracing::debug!(
                    scope = %scope,
                    tools = state.tools.len(),
                    team = state.team.as_deref().unwrap_or("none"),
                    "Resuming recorded installation"
                );
                let settings = match (&locations.team_source, state.team) {
                    (None, Some(team)) => {
                        let mut locations = locations.clone();
                        locations.team_source = Some(NormalizedPath::new(team));
                        Self::for_scope(scope, &locations)
                    }
                    _ => Self::for_scope(scope, locations),
                };
                Ok(settings.with_tools(state.tools))
            }
            LoadedState::Corrupt { reason } => {
                tracing::warn!(%reason, "Recorded tools unavailable");
                Ok(Self::for_scope(scope, locations))
            }
        }
    }

    /// Select tool integrations; duplicates are dropped.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        let mut tools: Vec<Tool> = tools.into_iter().collect();
        tools.sort();
        tools.dedup();
        self.tools = tools;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Team layer composed into a project installation
    pub fn team(&self) -> Option<&NormalizedPath> {
        self.team.as_ref()
    }

    /// Empty state recording this run's scope, tools, and team layer.
    pub fn selection(&self) -> InstallationState {
        InstallationState::new(self.scope, self.tools.clone())
            .with_team(self.team.as_ref().map(|team| team.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn locations(root: &std::path::Path, team: bool) -> InstallLocations {
        let root = NormalizedPath::new(root);
        InstallLocations {
            home: root.join("home"),
            base_source: root.join("source"),
            team_source: team.then(|| root.join("team")),
            project_dir: root.join("project"),
        }
    }

    #[test]
    fn base_scope_installs_source_into_home() {
        let locations = locations(std::path::Path::new("/w"), true);
        let settings = SyncSettings::for_scope(Scope::Base, &locations);

        assert_eq!(settings.target_root.as_str(), "/w/home");
        let layers: Vec<_> = settings
            .layers()
            .iter()
            .map(|l| (l.name(), l.root().as_str().to_string()))
            .collect();
        assert_eq!(layers, vec![(LayerName::Base, "/w/source".to_string())]);
    }

    #[test]
    fn project_scope_composes_home_team_and_local() {
        let locations = locations(std::path::Path::new("/w"), true);
        let settings = SyncSettings::for_scope(Scope::Project, &locations);

        assert_eq!(settings.target_root.as_str(), "/w/project/.agent-os");
        let layers: Vec<_> = settings
            .layers()
            .iter()
            .map(|l| (l.name(), l.root().as_str().to_string()))
            .collect();
        assert_eq!(
            layers,
            vec![
                (LayerName::Base, "/w/home".to_string()),
                (LayerName::Team, "/w/team".to_string()),
                (LayerName::Project, "/w/project/.agent-os.local".to_string()),
            ]
        );
    }

    #[test]
    fn project_scope_without_team() {
        let locations = locations(std::path::Path::new("/w"), false);
        let settings = SyncSettings::for_scope(Scope::Project, &locations);
        assert_eq!(settings.layers().len(), 2);
    }

    #[test]
    fn with_tools_dedupes() {
        let locations = locations(std::path::Path::new("/w"), false);
        let settings = SyncSettings::for_scope(Scope::Base, &locations).with_tools([
            Tool::Cursor,
            Tool::ClaudeCode,
            Tool::Cursor,
        ]);
        assert_eq!(settings.tools(), &[Tool::ClaudeCode, Tool::Cursor]);
    }

    #[test]
    fn resume_requires_installation() {
        let temp = TempDir::new().unwrap();
        let err = SyncSettings::resume(Scope::Base, &locations(temp.path(), false)).unwrap_err();
        assert!(matches!(err, Error::NotInstalled { .. }));
    }

    #[test]
    fn resume_restores_recorded_tools() {
        let temp = TempDir::new().unwrap();
        let locations = locations(temp.path(), false);
        let store = StateStore::for_target(&locations.home);
        store
            .save(&InstallationState::new(Scope::Base, vec![Tool::Copilot]))
            .unwrap();

        let settings = SyncSettings::resume(Scope::Base, &locations).unwrap();
        assert_eq!(settings.tools(), &[Tool::Copilot]);
    }

    #[test]
    fn base_scope_records_no_team() {
        let locations = locations(std::path::Path::new("/w"), true);
        let settings = SyncSettings::for_scope(Scope::Base, &locations);
        assert_eq!(settings.team(), None);
        assert_eq!(settings.selection().team, None);
    }

    #[test]
    fn resume_restores_recorded_team() {
        let temp = TempDir::new().unwrap();
        let with_team = locations(temp.path(), true);
        let store = StateStore::for_target(&with_team.project_target());
        store
            .save(&SyncSettings::for_scope(Scope::Project, &with_team).selection())
            .unwrap();

        let settings =
            SyncSettings::resume(Scope::Project, &locations(temp.path(), false)).unwrap();
        assert_eq!(settings.team(), with_team.team_source.as_ref());
        assert_eq!(settings.layers().len(), 3);
        assert_eq!(settings.layers()[1].name(), LayerName::Team);
    }

    #[test]
    fn explicit_team_overrides_recorded_team() {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path());
        let mut locations = locations(temp.path(), true);
        let store = StateStore::for_target(&locations.project_target());
        store
            .save(&SyncSettings::for_scope(Scope::Project, &locations).selection())
            .unwrap();

        locations.team_source = Some(root.join("other-team"));
        let settings = SyncSettings::resume(Scope::Project, &locations).unwrap();
        assert_eq!(settings.team(), Some(&root.join("other-team")));
    }
}
