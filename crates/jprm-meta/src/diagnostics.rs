//! Advisory diagnostics emitted while generating metadata and manifests.
//!
//! Generation functions never log directly. They report through a
//! [`DiagnosticSink`] handed in by the caller, which keeps them pure and
//! lets tests assert on exactly what was reported.

use std::fmt;
use std::path::PathBuf;

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal observation about the input being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Neither `image` nor `imageUrl` is configured.
    MissingImage,
    /// Both `image` and `imageUrl` are configured; `image` wins.
    ImageAndImageUrl,
    /// The default image file was found next to the build config.
    ImageAutodetected { path: PathBuf },
    /// No repository URL and no plugin URL were given.
    MissingRepositoryUrl,
    /// An explicit plugin URL replaces the generated source URL.
    PluginUrlOverride { plugin_url: String, generated: String },
    /// The image URL from the metadata is replaced by one derived from `image`.
    ImageUrlOverridden { previous: String, derived: String },
    /// The build config does not declare a target framework.
    DefaultFramework { framework: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ImageAutodetected { .. } | Self::PluginUrlOverride { .. } => Severity::Info,
            Self::MissingImage
            | Self::ImageAndImageUrl
            | Self::MissingRepositoryUrl
            | Self::ImageUrlOverridden { .. }
            | Self::DefaultFramework { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImage => f.write_str("Neither image nor imageUrl is specified."),
            Self::ImageAndImageUrl => f.write_str("Both image and imageUrl is specified."),
            Self::ImageAutodetected { path } => {
                write!(f, "Image autodetected at path `{}`.", path.display())
            }
            Self::MissingRepositoryUrl => {
                f.write_str("repo and plugin url not provided, provide at least one.")
            }
            Self::PluginUrlOverride {
                plugin_url,
                generated,
            } => write!(
                f,
                "Plugin url `{plugin_url}` overrides the autogenerated `{generated}`."
            ),
            Self::ImageUrlOverridden { previous, derived } => write!(
                f,
                "Image URL `{previous}` is getting overwritten by `{derived}` due to presence of `image`."
            ),
            Self::DefaultFramework { framework } => write!(
                f,
                "`framework` is not specified in build manifest, defaulting to `{framework}`. \
                 The default target framework may change in the future."
            ),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at a level matching their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => tracing::info!("{diagnostic}"),
            Severity::Warning => tracing::warn!("{diagnostic}"),
        }
    }
}

/// Keeps every diagnostic it receives.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.diagnostics.contains(diagnostic)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
