//! Shared test utilities for the jprm workspace.
//!
//! Dev-dependency only. Fixtures are written with plain `zip` and
//! `serde_json` so that every crate in the workspace can use them.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for plugin source directories
//! - [`package`]: hand-built plugin packages and their metadata

pub mod package;
pub mod project;

pub use package::{PackageFixture, plugin_meta};
pub use project::TestProject;

/// GUID shared by most fixtures.
pub const PLUGIN_A_GUID: &str = "f5ddc434-4b42-45d0-a049-8dda7f1ed30b";

/// Second GUID for multi-plugin scenarios.
pub const PLUGIN_B_GUID: &str = "0b3b5a1e-9c3f-4a53-9a51-2a3c8a2b7d10";
