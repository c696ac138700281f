//! Filesystem primitives for the Agent OS installer
//!
//! Provides normalized path handling, canonical content checksums, and
//! atomic locked writes used by the layer synchronizer.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::InstallPath;
pub use error::{Error, Result};
pub use path::{NormalizedPath, logical_path_from, validate_logical_path};
