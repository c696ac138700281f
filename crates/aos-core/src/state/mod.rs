//! Installation state
//!
//! The state file is the only record with a lifetime beyond one run. It maps
//! every installed logical path to the checksum that was written and the
//! layer it came from; a live file whose checksum no longer matches has been
//! edited by the user.

mod store;

pub use store::{LoadedState, StateStore};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::layer::{LayerName, Tool};

/// Current state format version
pub const STATE_VERSION: &str = "1.0";

/// Which layers an installation composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Base layer only, installed into the user-level home
    Base,
    /// Base + team + project-local layers, installed into a project
    Project,
}

impl Scope {
    /// Layers composed for this scope, in ascending precedence.
    pub fn layers(self) -> &'static [LayerName] {
        match self {
            Self::Base => &[LayerName::Base],
            Self::Project => &LayerName::ALL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "project" => Ok(Self::Project),
            _ => Err(Error::UnknownName {
                kind: "scope",
                value: s.to_string(),
            }),
        }
    }
}

/// Record of one installed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledFile {
    /// Layer that supplied the installed content
    pub layer: LayerName,
    /// Checksum of the content that was written
    pub checksum: String,
    /// When the file was last written or adopted
    pub synced: DateTime<Utc>,
}

/// Persisted record of a target's installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationState {
    /// State format version for forward compatibility
    version: String,
    /// Layer selection of this installation
    pub scope: Scope,
    /// Selected tool integrations
    #[serde(default)]
    pub tools: Vec<Tool>,
    /// Team layer directory composed into a project installation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Last time any record changed
    pub updated: DateTime<Utc>,
    /// Installed files keyed by logical path
    #[serde(default)]
    pub files: BTreeMap<String, InstalledFile>,
}

impl InstallationState {
    /// Create an empty state for a fresh installation
    pub fn new(scope: Scope, tools: Vec<Tool>) -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            scope,
            tools,
            team: None,
            updated: Utc::now(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_team(mut self, team: Option<String>) -> Self {
        self.team = team;
        self
    }

    /// Whether `other` selects the same scope, tools, and team layer.
    pub fn same_selection(&self, other: &InstallationState) -> bool {
        self.scope == other.scope && self.tools == other.tools && self.team == other.team
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, logical_path: &str) -> Option<&InstalledFile> {
        self.files.get(logical_path)
    }

    /// Record that `checksum` from `layer` is now installed at `logical_path`.
    pub fn record(&mut self, logical_path: impl Into<String>, layer: LayerName, checksum: String) {
        let now = Utc::now();
        self.files.insert(
            logical_path.into(),
            InstalledFile {
                layer,
                checksum,
                synced: now,
            },
        );
        self.updated = now;
    }

    /// Drop the record for `logical_path`, returning it if present.
    pub fn forget(&mut self, logical_path: &str) -> Option<InstalledFile> {
        let removed = self.files.remove(logical_path);
        if removed.is_some() {
            self.updated = Utc::now();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
