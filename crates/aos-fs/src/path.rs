//! Normalized path handling for cross-platform compatibility

use std::path::{Component, Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Provides consistent path handling across platforms by normalizing
/// all paths to forward slashes internally and converting to
/// platform-native format only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// Validate that a logical path stays inside the root it is joined onto.
///
/// Logical paths are relative, forward-slash separated, and may not contain
/// empty, `.` or `..` segments.
///
/// # Errors
///
/// Returns a human-readable message describing the violation.
pub fn validate_logical_path(path: &str) -> std::result::Result<(), String> {
    if path.is_empty() {
        return Err("Logical path cannot be empty".to_string());
    }
    if path.starts_with('/') || path.contains('\\') || path.contains(':') {
        return Err(format!("Logical path must be relative: {}", path));
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err(format!("Logical path has an empty segment: {}", path)),
            "." | ".." => {
                return Err(format!(
                    "Logical path may not traverse directories: {}",
                    path
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Build the logical path of `path` relative to `root`.
///
/// Returns `None` when `path` is not below `root` or contains components
/// that cannot be expressed as a logical path.
pub fn logical_path_from(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_path_rejects_traversal() {
        assert!(validate_logical_path("../etc/passwd").is_err());
        assert!(validate_logical_path("standards/../../x").is_err());
        assert!(validate_logical_path("/abs/path").is_err());
        assert!(validate_logical_path("a//b").is_err());
        assert!(validate_logical_path("").is_err());
    }

    #[test]
    fn logical_path_accepts_nested_relative() {
        assert!(validate_logical_path("standards/code-style.md").is_ok());
        assert!(validate_logical_path("tools/claude-code/commands/plan.md").is_ok());
    }

    #[test]
    fn logical_path_from_strips_root() {
        let root = Path::new("/layers/base");
        let file = root.join("standards").join("code-style.md");
        assert_eq!(
            logical_path_from(root, &file).as_deref(),
            Some("standards/code-style.md")
        );
    }

    #[test]
    fn logical_path_from_outside_root_is_none() {
        let root = Path::new("/layers/base");
        assert!(logical_path_from(root, Path::new("/elsewhere/x.md")).is_none());
        assert!(logical_path_from(root, root).is_none());
    }
}
