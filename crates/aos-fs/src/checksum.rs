//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used for
//! shipped layer content, installed files, and the installation state.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw bytes.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of string content.
pub fn compute_content_checksum(content: &str) -> String {
    compute_bytes_checksum(content.as_bytes())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(compute_bytes_checksum(&content))
}

/// Checksum of the file at `path`, or `None` when it does not exist.
///
/// Any error other than `NotFound` is returned so that unreadable files are
/// never mistaken for missing ones.
pub fn probe_file_checksum(path: &Path) -> std::io::Result<Option<String>> {
    match compute_file_checksum(path) {
        Ok(checksum) => Ok(Some(checksum)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_has_prefix() {
        let checksum = compute_content_checksum("hello world");
        assert!(checksum.starts_with("sha256:"));
    }

    #[test]
    fn different_content_different_checksum() {
        let a = compute_content_checksum("aaa");
        let b = compute_content_checksum("bbb");
        assert_ne!(a, b);
    }

    #[test]
    fn content_checksum_known_value() {
        let checksum = compute_content_checksum("hello world");
        assert_eq!(
            checksum,
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn file_checksum_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        let file_cs = compute_file_checksum(&path).unwrap();
        let content_cs = compute_content_checksum("hello world");
        assert_eq!(file_cs, content_cs);
    }

    #[test]
    fn probe_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let probed = probe_file_checksum(&dir.path().join("absent.md")).unwrap();
        assert!(probed.is_none());
    }

    #[test]
    fn probe_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_file_checksum(dir.path()).is_err());
    }
}
