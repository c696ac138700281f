//! Layer and tool identities
//!
//! A layer is a named source of instruction files with a fixed precedence.
//! Tools are the optional assistant integrations shipped under `tools/<name>/`.

use std::fmt;
use std::str::FromStr;

use aos_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Name of a configuration layer.
///
/// Ordering follows precedence: `Base < Team < Project`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerName {
    Base,
    Team,
    Project,
}

impl LayerName {
    /// All layers in ascending precedence.
    pub const ALL: [LayerName; 3] = [LayerName::Base, LayerName::Team, LayerName::Project];

    /// Higher wins when two layers provide the same logical path.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Base => 0,
            Self::Team => 1,
            Self::Project => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Team => "team",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| Error::UnknownName {
                kind: "layer",
                value: s.to_string(),
            })
    }
}

/// Identifies one layer's source tree for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    name: LayerName,
    root: NormalizedPath,
    precedence: u8,
    mandatory: bool,
}

impl LayerDescriptor {
    /// Describe `name` rooted at `root`.
    ///
    /// Only the base layer is mandatory; a missing team or project layer is
    /// treated as empty.
    pub fn new(name: LayerName, root: NormalizedPath) -> Self {
        Self {
            name,
            root,
            precedence: name.precedence(),
            mandatory: name == LayerName::Base,
        }
    }

    pub fn name(&self) -> LayerName {
        self.name
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }
}

/// AI assistant integrations with tool-specific files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    ClaudeCode,
    Cursor,
    Copilot,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::ClaudeCode, Tool::Cursor, Tool::Copilot];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClaudeCode => "claude-code",
            Self::Cursor => "cursor",
            Self::Copilot => "copilot",
        }
    }

    /// Directory holding this tool's files, relative to a layer root.
    pub fn layer_dir(self) -> String {
        format!("{}/{}", aos_fs::InstallPath::ToolsDir, self.as_str())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| Error::UnknownName {
                kind: "tool",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_strictly_ordered() {
        assert!(LayerName::Base.precedence() < LayerName::Team.precedence());
        assert!(LayerName::Team.precedence() < LayerName::Project.precedence());
    }

    #[test]
    fn only_base_is_mandatory() {
        let root = NormalizedPath::new("/layers");
        assert!(LayerDescriptor::new(LayerName::Base, root.clone()).is_mandatory());
        assert!(!LayerDescriptor::new(LayerName::Team, root.clone()).is_mandatory());
        assert!(!LayerDescriptor::new(LayerName::Project, root).is_mandatory());
    }

    #[test]
    fn tool_names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(tool.as_str().parse::<Tool>().unwrap(), tool);
        }
        assert!("vscode".parse::<Tool>().is_err());
    }

    #[test]
    fn tool_layer_dir_is_under_tools() {
        assert_eq!(Tool::ClaudeCode.layer_dir(), "tools/claude-code");
    }
}
