//! Error types for jprm-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from jprm-core
    #[error(transparent)]
    Core(#[from] jprm_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The command line was wrong: bad argument, missing file, unknown plugin
    #[error("{message}")]
    Usage { message: String },
}

impl From<jprm_meta::Error> for CliError {
    fn from(e: jprm_meta::Error) -> Self {
        Self::Core(e.into())
    }
}

impl CliError {
    /// Create a new usage error with the given message
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for usage errors, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => 2,
            Self::Core(e) if e.is_usage() => 2,
            _ => 1,
        }
    }
}
