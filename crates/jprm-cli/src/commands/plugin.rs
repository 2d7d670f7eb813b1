//! `jprm plugin build` and `jprm plugin package`

use std::path::{Path, PathBuf};

use jprm_core::{BuildOptions, PackageOptions, build_plugin, package_plugin};
use jprm_meta::{BuildConfig, TracingSink};

use crate::error::{CliError, Result};

/// Arguments of `jprm plugin build`
#[derive(Debug, Clone)]
pub struct PluginBuildArgs {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub version: Option<String>,
    pub configuration: String,
    pub framework: Option<String>,
    pub max_cpu_count: usize,
}

fn load_config(path: &Path) -> Result<BuildConfig> {
    if !path.is_dir() {
        return Err(CliError::usage(format!(
            "Directory `{}` does not exist.",
            path.display()
        )));
    }
    match BuildConfig::discover(path) {
        Ok((_, config)) => Ok(config),
        Err(jprm_meta::Error::ConfigNotFound { .. }) => Err(CliError::usage(format!(
            "No build config found in `{}`",
            path.display()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Build into a scratch directory, package, and print the archive path.
pub fn run_plugin_build(args: PluginBuildArgs) -> Result<()> {
    let config = load_config(&args.path)?;
    let bin_dir = tempfile::tempdir()?;

    let options = BuildOptions {
        version: args.version.clone(),
        configuration: args.configuration,
        framework: args.framework,
        max_cpu_count: args.max_cpu_count,
        ..BuildOptions::new(bin_dir.path())
    };
    build_plugin(&args.path, &options, &config, &mut TracingSink)?;

    let archive = package_plugin(
        &args.path,
        &config,
        &PackageOptions {
            version: args.version,
            binary_path: Some(bin_dir.path().to_path_buf()),
            output: args.output,
            timestamp: None,
        },
        &mut TracingSink,
    )?;
    println!("{}", archive.display());
    Ok(())
}

/// Package already built binaries and print the archive path.
pub fn run_plugin_package(
    path: &Path,
    binary_path: Option<PathBuf>,
    output: Option<PathBuf>,
    version: Option<String>,
) -> Result<()> {
    let config = load_config(path)?;
    let archive = package_plugin(
        path,
        &config,
        &PackageOptions {
            version,
            binary_path,
            output,
            timestamp: None,
        },
        &mut TracingSink,
    )?;
    println!("{}", archive.display());
    Ok(())
}
