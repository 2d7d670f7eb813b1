//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jprm_meta::Version;

/// Jellyfin Plugin Repository Manager - build, package and publish plugins
#[derive(Parser, Debug)]
#[command(name = "jprm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level
    #[arg(
        long,
        global = true,
        value_enum,
        env = "JPRM_VERBOSITY",
        default_value_t = Verbosity::Info,
        ignore_case = true
    )]
    pub verbosity: Verbosity,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Log levels accepted by `--verbosity`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build and package plugins
    Plugin {
        #[command(subcommand)]
        action: PluginAction,
    },

    /// Manage a plugin repository
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },
}

/// Plugin subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PluginAction {
    /// Build a plugin with dotnet and package the result
    ///
    /// Prints the path of the created archive.
    Build {
        /// Plugin project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Directory receiving the package
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Plugin version
        #[arg(short = 'v', long)]
        version: Option<String>,

        /// Dotnet configuration
        #[arg(long, default_value = "Release")]
        dotnet_configuration: String,

        /// Dotnet framework (netstandard2.1)
        #[arg(long)]
        dotnet_framework: Option<String>,

        /// Max number of cores to use during build
        #[arg(long, default_value_t = 1)]
        max_cpu_count: usize,
    },

    /// Package already built binaries
    ///
    /// Prints the path of the created archive.
    Package {
        /// Plugin project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Directory holding the built binaries (./bin/)
        #[arg(short, long)]
        binary_path: Option<PathBuf>,

        /// Directory receiving the package (./artifacts/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Plugin version
        #[arg(short = 'v', long)]
        version: Option<String>,
    },
}

/// Repository subcommands
///
/// REPO_PATH is a manifest file ending in `.json`, or a directory
/// holding `manifest.json`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RepoAction {
    /// Create an empty repository manifest
    Init {
        repo_path: PathBuf,
    },

    /// Add plugin packages to the repository
    Add {
        repo_path: PathBuf,

        /// Plugin zip files
        #[arg(required = true)]
        plugins: Vec<PathBuf>,

        /// Repository public base URL
        #[arg(short = 'u', long, default_value = "")]
        url: String,

        /// Full URL of the plugin zip file, once per plugin
        #[arg(short = 'U', long = "plugin-url")]
        plugin_urls: Vec<String>,
    },

    /// List plugins, or the versions of one plugin
    List {
        repo_path: PathBuf,

        /// Plugin GUID, name or slug
        plugin: Option<String>,
    },

    /// Remove a plugin, or one version of it
    Remove {
        repo_path: PathBuf,

        /// Plugin GUID, name or slug
        plugin: String,

        /// Version to remove
        #[arg(value_parser = parse_version)]
        version: Option<Version>,
    },
}

fn parse_version(s: &str) -> Result<Version, String> {
    Version::parse(s).map_err(|e| e.to_string())
}
