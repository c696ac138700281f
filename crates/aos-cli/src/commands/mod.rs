//! Command implementations for aos-cli

pub mod diff;
pub mod install;
pub mod render;
pub mod sync;

pub use diff::run_diff;
pub use install::run_install;
pub use sync::{run_reset, run_status, run_sync};
