//! Shared test utilities for the Agent OS installer workspace.
//!
//! - [`fixture`]: [`TestInstall`], a temporary tree holding layer sources
//!   and installation targets

pub mod fixture;

pub use fixture::TestInstall;
