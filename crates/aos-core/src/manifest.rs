//! Manifest reader
//!
//! Enumerates the files a layer ships. Each layer root may carry a
//! `layer.toml` declaring which top-level directories are installed; without
//! one the default `standards`, `instructions` and `commands` directories are
//! read. Selected tool integrations add `tools/<tool>/`.
//!
//! A `layer.toml` is itself shipped, so an installation used as the base
//! layer of another scope keeps the directories its source declared.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use aos_fs::checksum::compute_bytes_checksum;
use aos_fs::{ConfigStore, InstallPath, logical_path_from, validate_logical_path};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::backup::is_backup_name;
use crate::layer::{LayerDescriptor, LayerName, Tool};
use crate::{Error, Result};

/// Directories installed when a layer has no `layer.toml`
pub const DEFAULT_DIRECTORIES: &[&str] = &["standards", "instructions", "commands"];

fn default_directories() -> Vec<String> {
    DEFAULT_DIRECTORIES.iter().map(|d| d.to_string()).collect()
}

/// Optional per-layer manifest (`layer.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerManifest {
    /// Directories, relative to the layer root, whose files are installed
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,
}

impl Default for LayerManifest {
    fn default() -> Self {
        Self {
            directories: default_directories(),
        }
    }
}

/// One file shipped by one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Destination-relative path, forward-slash separated
    pub logical_path: String,
    /// Layer that ships this file
    pub source_layer: LayerName,
    /// Absolute path of the shipped file
    pub source_path: PathBuf,
    /// Canonical checksum of `content`
    pub checksum: String,
    /// Shipped bytes
    pub content: Vec<u8>,
}

impl FileCandidate {
    /// Build a candidate from in-memory content.
    pub fn new(
        logical_path: impl Into<String>,
        source_layer: LayerName,
        source_path: impl Into<PathBuf>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            logical_path: logical_path.into(),
            source_layer,
            source_path: source_path.into(),
            checksum: compute_bytes_checksum(&content),
            content,
        }
    }
}

/// Reads the file candidates of a layer.
#[derive(Debug, Clone, Default)]
pub struct ManifestReader {
    tools: Vec<Tool>,
    store: ConfigStore,
}

impl ManifestReader {
    /// Create a reader that also includes the given tool integrations.
    pub fn new(tools: &[Tool]) -> Self {
        Self {
            tools: tools.to_vec(),
            store: ConfigStore::new(),
        }
    }

    /// Load the layer's `layer.toml`, or the defaults when it has none.
    pub fn load_manifest(&self, layer: &LayerDescriptor) -> Result<LayerManifest> {
        let path = layer.root().join(InstallPath::LayerManifest.as_str());
        if !path.is_file() {
            return Ok(LayerManifest::default());
        }
        self.store
            .load(&path)
            .map_err(|e| Error::manifest_read(layer.name(), path.to_native(), e))
    }

    /// Directories to walk for `layer`, in declaration order.
    fn directories(&self, layer: &LayerDescriptor) -> Result<Vec<String>> {
        let manifest = self.load_manifest(layer)?;
        let mut directories = manifest.directories;
        directories.extend(self.tools.iter().map(|tool| tool.layer_dir()));

        for dir in &directories {
            validate_logical_path(dir).map_err(|message| {
                Error::manifest_read(layer.name(), layer.root().to_native(), message)
            })?;
        }
        Ok(directories)
    }

    /// Enumerate the layer's files in lexicographic logical-path order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestRead`] when a mandatory layer's root is
    /// missing, or when any file inside an existing layer cannot be read.
    /// A missing optional layer yields an empty list.
    pub fn read(&self, layer: &LayerDescriptor) -> Result<Vec<FileCandidate>> {
        let root = layer.root().to_native();

        if !root.is_dir() {
            if layer.is_mandatory() {
                return Err(Error::manifest_read(
                    layer.name(),
                    root,
                    "layer root does not exist",
                ));
            }
            tracing::debug!(layer = %layer.name(), root = %layer.root(), "Optional layer absent - skipping");
            return Ok(Vec::new());
        }

        let mut candidates: BTreeMap<String, FileCandidate> = BTreeMap::new();

        for dir in self.directories(layer)? {
            let dir_path = root.join(&dir);
            if !dir_path.is_dir() {
                tracing::debug!(layer = %layer.name(), dir = %dir, "Declared directory absent");
                continue;
            }

            for entry in WalkDir::new(&dir_path)
                .follow_links(false)
                .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            {
                let entry = entry.map_err(|e| {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_else(|| dir_path.clone());
                    Error::manifest_read(layer.name(), path, e)
                })?;

                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.file_name().to_str().is_some_and(is_backup_name) {
                    tracing::debug!(path = %entry.path().display(), "Skipping backup file");
                    continue;
                }

                let path = entry.path();
                let logical_path = logical_path_from(&root, path).ok_or_else(|| {
                    Error::manifest_read(layer.name(), path, "path is not representable")
                })?;
                let content =
                    fs::read(path).map_err(|e| Error::manifest_read(layer.name(), path, e))?;

                candidates.insert(
                    logical_path.clone(),
                    FileCandidate::new(logical_path, layer.name(), path, content),
                );
            }
        }

        let manifest_path = root.join(InstallPath::LayerManifest.as_str());
        if manifest_path.is_file() {
            let content = fs::read(&manifest_path)
                .map_err(|e| Error::manifest_read(layer.name(), &manifest_path, e))?;
            candidates.insert(
                InstallPath::LayerManifest.as_str().to_string(),
                FileCandidate::new(
                    InstallPath::LayerManifest.as_str(),
                    layer.name(),
                    manifest_path,
                    content,
                ),
            );
        }

        tracing::debug!(
            layer = %layer.name(),
            files = candidates.len(),
            "Read layer manifest"
        );
        Ok(candidates.into_values().collect())
    }
}
