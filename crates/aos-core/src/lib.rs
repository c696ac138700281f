//! Layer resolution and synchronization engine for the Agent OS installer
//!
//! This crate materializes a layered set of instruction files onto a
//! destination directory without discarding local edits:
//!
//! - **Manifest reading**: enumerate each layer's files deterministically
//! - **Layer resolution**: `project` overrides `team` overrides `base`
//! - **Diff/merge**: classify every file against the persisted installation state
//! - **Execution**: apply the classified actions with per-file failure isolation
//! - **Reporting**: aggregate what was created, skipped, backed up, or removed
//!
//! # Architecture
//!
//! ```text
//!                   agent-os CLI
//!                        |
//!                    SyncEngine
//!                        |
//!   ManifestReader -> LayerResolver -> DiffEngine -> SyncExecutor
//!                        |                 |             |
//!                        +------ StateStore (.install-state.toml)
//!                                          |
//!                                       aos-fs
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod layer;
pub mod manifest;
pub mod resolver;
pub mod state;
pub mod sync;

pub use backup::BackupManager;
pub use config::{InstallLocations, SyncSettings};
pub use error::{Error, Result};
pub use layer::{LayerDescriptor, LayerName, Tool};
pub use manifest::{FileCandidate, LayerManifest, ManifestReader};
pub use resolver::{FileEntry, LayerResolver, ResolvedSet};
pub use state::{InstallationState, InstalledFile, LoadedState, Scope, StateStore};
pub use sync::{
    ActionOutcome, DiffEngine, FileFailure, InstallationReport, MergeHint, Plan, PlannedAction,
    SyncAction, SyncEngine, SyncExecutor,
};
