use std::path::PathBuf;

/// Errors produced while building or editing plugin metadata and manifests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Version string does not match the 1-4 part dotted numeric grammar.
    #[error("invalid version '{version}': expected 1 to 4 dot-separated numbers")]
    InvalidVersionFormat { version: String },

    /// Version component index outside major/minor/build/revision.
    #[error("version component index {index} out of range (0-3)")]
    ComponentOutOfRange { index: usize },

    /// Build config lacks a field required for metadata generation.
    #[error("build config is missing required field '{field}'")]
    MissingRequiredField { field: &'static str },

    /// GUID field cannot be parsed as a UUID.
    #[error("invalid guid '{value}': {source}")]
    InvalidGuid {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// Image declared in the build config does not exist.
    #[error("image '{image}' not found at expected path {}", path.display())]
    ImageNotFound { image: String, path: PathBuf },

    /// No build config found in any of the probed locations.
    #[error("no build config found in {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Repository manifest does not exist.
    #[error("cannot find repository at {}; try initializing the repo first", path.display())]
    RepositoryNotFound { path: PathBuf },

    /// Repository manifest already exists.
    #[error("there is already an existing repository at {}", path.display())]
    RepositoryAlreadyExists { path: PathBuf },

    /// Filesystem error.
    #[error(transparent)]
    Fs(#[from] jprm_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
