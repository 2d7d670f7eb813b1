//! Compiling a plugin with the dotnet toolchain.

use std::path::{Path, PathBuf};

use jprm_meta::{BuildConfig, DEFAULT_FRAMEWORK, Diagnostic, DiagnosticSink, Version};

use crate::error::Result;
use crate::project::{find_project_files, set_project_framework, set_project_version};
use crate::toolchain::{PublishArgs, Toolchain};

/// Options for [`build_plugin`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Publish directory handed to the toolchain.
    pub output: PathBuf,
    /// Version to build instead of the configured one.
    pub version: Option<String>,
    pub configuration: String,
    /// Target framework instead of the configured one.
    pub framework: Option<String>,
    pub max_cpu_count: usize,
    pub toolchain: Toolchain,
}

impl BuildOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            version: None,
            configuration: "Release".to_string(),
            framework: None,
            max_cpu_count: 1,
            toolchain: Toolchain::new(),
        }
    }
}

/// Pick the target framework: explicit option, then config, then the default.
pub fn resolve_framework(
    options: &BuildOptions,
    config: &BuildConfig,
    sink: &mut dyn DiagnosticSink,
) -> String {
    if let Some(framework) = &options.framework {
        return framework.clone();
    }
    match &config.framework {
        Some(framework) => framework.clone(),
        None => {
            sink.emit(Diagnostic::DefaultFramework {
                framework: DEFAULT_FRAMEWORK.to_string(),
            });
            DEFAULT_FRAMEWORK.to_string()
        }
    }
}

/// Stamp version and framework into the project at `path` and publish it
/// into `options.output`.
pub fn build_plugin(
    path: &Path,
    options: &BuildOptions,
    config: &BuildConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    let version = match &options.version {
        Some(version) => version.as_str(),
        None => config.require_version()?,
    };
    let version = Version::parse(version)?.full();
    let framework = resolve_framework(options, config, sink);

    for project in find_project_files(path)? {
        set_project_version(&project, &version)?;
        set_project_framework(&project, &framework)?;
    }

    let toolchain = &options.toolchain;
    toolchain.clean(path, &options.configuration, &framework)?;
    toolchain.restore(path)?;
    toolchain.publish(
        path,
        &PublishArgs {
            configuration: &options.configuration,
            framework: &framework,
            output: &options.output,
            version: &version,
            max_cpu_count: options.max_cpu_count,
        },
    )?;

    tracing::info!("Built {} {} into {}", path.display(), version, options.output.display());
    Ok(())
}
