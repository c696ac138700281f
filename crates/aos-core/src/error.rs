//! Error types for aos-core

use std::path::PathBuf;

use crate::layer::LayerName;

/// Result type for aos-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in aos-core operations
///
/// Only fatal conditions are surfaced through this type. Failures that
/// concern a single file are collected into the installation report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A layer's source tree could not be enumerated
    #[error("Cannot read {layer} layer at {path}: {reason}")]
    ManifestRead {
        layer: LayerName,
        path: PathBuf,
        reason: String,
    },

    /// The installation state exists but cannot be parsed
    #[error("Installation state at {path} is corrupt: {message}")]
    StateCorruption { path: PathBuf, message: String },

    /// No installation state at the target
    #[error("No installation found at {path}")]
    NotInstalled { path: PathBuf },

    /// A logical path escapes the root it is joined onto
    #[error("Invalid logical path: {message}")]
    InvalidPath { message: String },

    /// A name that does not match any known layer, scope, or tool
    #[error("Unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },

    /// Filesystem error from aos-fs
    #[error(transparent)]
    Fs(#[from] aos_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn manifest_read(
        layer: LayerName,
        path: impl Into<PathBuf>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::ManifestRead {
            layer,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
