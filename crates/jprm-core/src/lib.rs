//! Build, package and publish orchestration for jprm
//!
//! `jprm-core` sits between the CLI and the model and filesystem crates:
//!
//! ```text
//!           jprm-cli
//!              |
//!          jprm-core
//!           /     \
//!     jprm-meta   |
//!           \     |
//!           jprm-fs
//! ```
//!
//! - [`build`]: stamp project files and run the dotnet toolchain
//! - [`package`]: turn build outputs into a plugin archive with sidecars
//! - [`publish`]: fold archives into a repository manifest
//!
//! Advisory findings are reported through a
//! [`DiagnosticSink`](jprm_meta::DiagnosticSink) supplied by the caller.

pub mod build;
pub mod error;
pub mod package;
pub mod project;
pub mod publish;
pub mod toolchain;

pub use build::{BuildOptions, build_plugin};
pub use error::{Error, Result};
pub use package::{
    PackageOptions, manifest_entry_from_package, metadata_sidecar_path, package_plugin,
    read_package_metadata,
};
pub use publish::{
    AddedPlugin, add_plugins, init_repository, list_plugins, list_versions, remove_plugin,
};
pub use toolchain::{CommandOutput, Toolchain, run_command};
