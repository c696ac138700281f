//! Layer resolution
//!
//! Composes the candidates of every layer into one file per logical path,
//! taken from the highest-precedence layer that ships it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use aos_fs::{NormalizedPath, validate_logical_path};

use crate::layer::{LayerDescriptor, LayerName};
use crate::manifest::FileCandidate;
use crate::state::InstallationState;
use crate::{Error, Result};

/// A file in the resolved set, bound to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub logical_path: String,
    pub source_layer: LayerName,
    pub source_path: PathBuf,
    pub checksum: String,
    pub content: Vec<u8>,
    /// Absolute path this entry is written to
    pub destination: NormalizedPath,
}

impl FileEntry {
    fn from_candidate(candidate: FileCandidate, target_root: &NormalizedPath) -> Self {
        let destination = target_root.join(&candidate.logical_path);
        Self {
            logical_path: candidate.logical_path,
            source_layer: candidate.source_layer,
            source_path: candidate.source_path,
            checksum: candidate.checksum,
            content: candidate.content,
            destination,
        }
    }
}

/// Output of [`LayerResolver::resolve`]
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet {
    /// Winning entries, one per logical path, in logical-path order
    pub entries: Vec<FileEntry>,
    /// Lower-precedence candidates overridden by a winner, per logical path
    pub shadowed: BTreeMap<String, Vec<FileCandidate>>,
    /// Previously installed logical paths that no current layer ships
    pub removed: Vec<String>,
}

impl ResolvedSet {
    pub fn get(&self, logical_path: &str) -> Option<&FileEntry> {
        self.entries
            .binary_search_by(|e| e.logical_path.as_str().cmp(logical_path))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Composes layers for one target root.
#[derive(Debug, Clone)]
pub struct LayerResolver {
    target_root: NormalizedPath,
}

impl LayerResolver {
    pub fn new(target_root: NormalizedPath) -> Self {
        Self { target_root }
    }

    /// Resolve the effective file set.
    ///
    /// Layers are processed in ascending precedence; for equal precedence
    /// the later input wins. `previous` is the installation state of the
    /// target, used to flag logical paths that disappeared upstream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if a candidate's logical path would
    /// escape the target root.
    pub fn resolve(
        &self,
        mut layers: Vec<(LayerDescriptor, Vec<FileCandidate>)>,
        previous: Option<&InstallationState>,
    ) -> Result<ResolvedSet> {
        // Stable: equal precedence keeps input order
        layers.sort_by_key(|(descriptor, _)| descriptor.precedence());

        let mut winners: BTreeMap<String, FileCandidate> = BTreeMap::new();
        let mut shadowed: BTreeMap<String, Vec<FileCandidate>> = BTreeMap::new();

        for (descriptor, candidates) in layers {
            tracing::debug!(
                layer = %descriptor.name(),
                files = candidates.len(),
                "Composing layer"
            );
            for candidate in candidates {
                validate_logical_path(&candidate.logical_path)
                    .map_err(|message| Error::InvalidPath { message })?;

                let key = candidate.logical_path.clone();
                if let Some(overridden) = winners.insert(key.clone(), candidate) {
                    shadowed.entry(key).or_default().push(overridden);
                }
            }
        }

        let removed = match previous {
            Some(state) => {
                let current: BTreeSet<&str> = winners.keys().map(String::as_str).collect();
                state
                    .files
                    .keys()
                    .filter(|path| !current.contains(path.as_str()))
                    .cloned()
                    .collect()
            }
            None => Vec::new(),
        };

        let entries = winners
            .into_values()
            .map(|candidate| FileEntry::from_candidate(candidate, &self.target_root))
            .collect();

        Ok(ResolvedSet {
            entries,
            shadowed,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Scope;
    use pretty_assertions::assert_eq;

    fn layer(name: LayerName) -> LayerDescriptor {
        LayerDescriptor::new(name, NormalizedPath::new(format!("/layers/{}", name)))
    }

    fn candidate(name: LayerName, path: &str, content: &str) -> FileCandidate {
        FileCandidate::new(
            path,
            name,
            format!("/layers/{}/{}", name, path),
            content.as_bytes().to_vec(),
        )
    }

    #[test]
    fn project_overrides_base() {
        let resolver = LayerResolver::new(NormalizedPath::new("/target"));
        let resolved = resolver
            .resolve(
                vec![
                    (
                        layer(LayerName::Project),
                        vec![candidate(LayerName::Project, "standards/a.md", "Y")],
                    ),
                    (
                        layer(LayerName::Base),
                        vec![candidate(LayerName::Base, "standards/a.md", "X")],
                    ),
                ],
                None,
            )
            .unwrap();

        let entry = resolved.get("standards/a.md").unwrap();
        assert_eq!(entry.content, b"Y");
        assert_eq!(entry.source_layer, LayerName::Project);
        assert_eq!(entry.destination.as_str(), "/target/standards/a.md");
        assert_eq!(resolved.shadowed["standards/a.md"].len(), 1);
        assert_eq!(resolved.shadowed["standards/a.md"][0].content, b"X");
    }

    #[test]
    fn equal_precedence_later_input_wins() {
        let resolver = LayerResolver::new(NormalizedPath::new("/target"));
        let resolved = resolver
            .resolve(
                vec![
                    (layer(LayerName::Team), vec![candidate(LayerName::Team, "a.md", "first")]),
                    (layer(LayerName::Team), vec![candidate(LayerName::Team, "a.md", "second")]),
                ],
                None,
            )
            .unwrap();

        assert_eq!(resolved.get("a.md").unwrap().content, b"second");
    }

    #[test]
    fn flags_paths_missing_from_every_layer() {
        let mut previous = InstallationState::new(Scope::Project, Vec::new());
        previous.record("standards/a.md", LayerName::Base, "sha256:a".into());
        previous.record("standards/old.md", LayerName::Team, "sha256:b".into());

        let resolver = LayerResolver::new(NormalizedPath::new("/target"));
        let resolved = resolver
            .resolve(
                vec![(
                    layer(LayerName::Base),
                    vec![candidate(LayerName::Base, "standards/a.md", "A")],
                )],
                Some(&previous),
            )
            .unwrap();

        assert_eq!(resolved.removed, vec!["standards/old.md".to_string()]);
    }

    #[test]
    fn rejects_escaping_logical_path() {
        let resolver = LayerResolver::new(NormalizedPath::new("/target"));
        let result = resolver.resolve(
            vec![(
                layer(LayerName::Base),
                vec![candidate(LayerName::Base, "../escape.md", "x")],
            )],
            None,
        );

        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }
}
