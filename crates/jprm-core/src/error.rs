//! Error types for jprm-core

use std::path::PathBuf;

/// Result type for jprm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, packaging or publishing plugins
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Declared build artifact missing from the binary directory
    #[error("artifact '{artifact}' not found at {}", path.display())]
    ArtifactNotFound { artifact: String, path: PathBuf },

    /// No project or solution file in the plugin directory
    #[error("no solution or project file found in {}", path.display())]
    ProjectNotFound { path: PathBuf },

    /// Package has neither a sidecar nor an embedded `meta.json`
    #[error("no metadata found for package {}", path.display())]
    MetadataNotFound { path: PathBuf },

    /// Metadata exists but is not valid
    #[error("invalid metadata in {}: {source}", path.display())]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Path given as a package is not a zip archive
    #[error("not a zip file: {}", path.display())]
    NotAPackage { path: PathBuf },

    /// `--plugin-url` given a different number of times than there are packages
    #[error(
        "when plugin url is specified, the number of times it's specified must match the number of plugins ({plugins} plugins, {urls} urls)"
    )]
    PluginUrlCount { plugins: usize, urls: usize },

    /// Package metadata names an image that is not a plain file name
    #[error("package {} declares image '{image}', which is not a plain file name", path.display())]
    InvalidImagePath { image: String, path: PathBuf },

    /// Plugin lookup failed
    #[error("plugin '{plugin}' not found in {}", path.display())]
    PluginNotFound { plugin: String, path: PathBuf },

    /// External program could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External program exited unsuccessfully
    #[error("command '{command}' failed with exit code {code}")]
    ToolchainFailure {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    // Transparent wrappers for underlying crate errors
    /// Metadata error from jprm-meta
    #[error(transparent)]
    Meta(#[from] jprm_meta::Error),

    /// Filesystem error from jprm-fs
    #[error(transparent)]
    Fs(#[from] jprm_fs::Error),
}

impl Error {
    /// Whether the error was caused by how the tool was invoked rather than
    /// by the data it processed.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NotAPackage { .. }
                | Self::PluginNotFound { .. }
                | Self::Meta(
                    jprm_meta::Error::RepositoryNotFound { .. }
                        | jprm_meta::Error::RepositoryAlreadyExists { .. }
                        | jprm_meta::Error::ConfigNotFound { .. }
                )
        )
    }
}
