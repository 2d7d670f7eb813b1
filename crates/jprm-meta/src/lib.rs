//! Plugin metadata and repository manifest model.
//!
//! This crate holds everything that can be expressed without touching a
//! toolchain: the [`Version`] model, build config parsing, metadata and
//! manifest-entry generation, and the merge engine that folds new builds
//! into the repository manifest.
//!
//! Generation functions report advisory findings through a
//! [`DiagnosticSink`] rather than logging on their own.

pub mod build_config;
pub mod diagnostics;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod metadata;
pub mod repository;
pub mod slug;
pub mod version;

/// Name of the metadata file inside a package, and the suffix of its sidecar.
pub const JSON_METADATA_FILE: &str = "meta.json";

/// Image picked up from the project directory when none is configured.
pub const DEFAULT_IMAGE_FILE: &str = "image.png";

/// Target framework used when neither the CLI nor the config names one.
pub const DEFAULT_FRAMEWORK: &str = "netstandard2.1";

/// Manifest file name used when a repository is given as a directory.
pub const DEFAULT_REPOSITORY_FILE: &str = "manifest.json";

/// Build config locations, probed in order.
pub const CONFIG_LOCATIONS: &[&str] = &[
    "jprm.yaml",
    ".jprm.yaml",
    ".ci/jprm.yaml",
    ".github/jprm.yaml",
    ".gitlab/jprm.yaml",
    "meta.yaml",
    "build.yaml",
];

pub use build_config::BuildConfig;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::{Error, Result};
pub use manifest::{PluginManifestEntry, VersionRecord, generate_manifest_entry};
pub use merge::merge_entry;
pub use metadata::{MetadataOptions, PluginMetadata, generate_metadata, resolve_image};
pub use repository::{
    PluginQuery, PluginSummary, Removal, RepositoryManifest, Upsert, resolve_manifest_path,
};
pub use slug::slugify;
pub use version::{Component, Version};
