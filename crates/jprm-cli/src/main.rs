//! Jellyfin Plugin Repository Manager CLI
//!
//! Builds and packages plugins and maintains plugin repository manifests.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, PluginAction, RepoAction, Verbosity};
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    if let Err(e) = execute_command(cli.command) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr so that stdout carries only command output.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::new(verbosity.as_filter());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: failed to install logger", "warning".yellow().bold());
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Plugin { action } => match action {
            PluginAction::Build {
                path,
                output,
                version,
                dotnet_configuration,
                dotnet_framework,
                max_cpu_count,
            } => commands::run_plugin_build(commands::PluginBuildArgs {
                path,
                output,
                version,
                configuration: dotnet_configuration,
                framework: dotnet_framework,
                max_cpu_count,
            }),
            PluginAction::Package {
                path,
                binary_path,
                output,
                version,
            } => commands::run_plugin_package(&path, binary_path, output, version),
        },
        Commands::Repo { action } => match action {
            RepoAction::Init { repo_path } => commands::run_repo_init(&repo_path),
            RepoAction::Add {
                repo_path,
                plugins,
                url,
                plugin_urls,
            } => commands::run_repo_add(&repo_path, &plugins, &url, &plugin_urls),
            RepoAction::List { repo_path, plugin } => {
                commands::run_repo_list(&repo_path, plugin.as_deref())
            }
            RepoAction::Remove {
                repo_path,
                plugin,
                version,
            } => commands::run_repo_remove(&repo_path, &plugin, version.as_ref()),
        },
    }
}
