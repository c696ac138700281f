//! Well-known names inside layer sources and install targets.

use std::path::Path;

/// Fixed file and directory names used by the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPath {
    /// Persisted installation state at the target root
    StateFile,
    /// Optional per-layer manifest declaring the directories to install
    LayerManifest,
    /// Directory holding tool-specific integrations inside a layer
    ToolsDir,
    /// Destination directory of a project installation
    ProjectInstallDir,
    /// Project-local layer source directory
    ProjectLayerDir,
    /// Default user-level install directory under the home directory
    HomeInstallDir,
}

impl InstallPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateFile => ".install-state.toml",
            Self::LayerManifest => "layer.toml",
            Self::ToolsDir => "tools",
            Self::ProjectInstallDir => ".agent-os",
            Self::ProjectLayerDir => ".agent-os.local",
            Self::HomeInstallDir => ".agent-os",
        }
    }
}

impl AsRef<Path> for InstallPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for InstallPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for InstallPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
