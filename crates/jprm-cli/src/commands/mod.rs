//! Command implementations for jprm-cli

pub mod plugin;
pub mod repo;

pub use plugin::{PluginBuildArgs, run_plugin_build, run_plugin_package};
pub use repo::{run_repo_add, run_repo_init, run_repo_list, run_repo_remove};
