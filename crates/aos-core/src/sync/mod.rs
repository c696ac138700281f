//! Synchronization of the resolved file set onto a target
//!
//! This module provides:
//! - **action**: the per-file decision and the plan that carries it
//! - **diff**: classification against installation state and the live tree
//! - **executor**: applying a plan with per-file failure isolation
//! - **report**: aggregation of what happened
//! - **merge**: unified diffs for files that need a manual merge
//! - **engine**: the facade tying manifest reading, resolution, and execution

mod action;
mod diff;
mod engine;
mod executor;
mod merge;
mod report;

pub use action::{Plan, PlannedAction, SyncAction};
pub use diff::DiffEngine;
pub use engine::SyncEngine;
pub use executor::SyncExecutor;
pub use merge::MergeHint;
pub use report::{ActionOutcome, FileFailure, InstallationReport};
