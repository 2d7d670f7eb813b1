//! `jprm repo` subcommands

use std::path::{Path, PathBuf};

use jprm_core::{add_plugins, init_repository, list_plugins, list_versions, remove_plugin};
use jprm_meta::{PluginSummary, TracingSink, Version, resolve_manifest_path};

use crate::error::{CliError, Result};

/// Resolve a repository argument and check it against what the command expects.
fn repo_path(value: &Path, should_exist: bool) -> Result<PathBuf> {
    let path = resolve_manifest_path(value);
    let exists = path.exists();

    if should_exist && !exists {
        return Err(CliError::usage(format!(
            "Can not find repository at `{}`. Try initializing the repo first.",
            path.display()
        )));
    }
    if !should_exist && exists {
        return Err(CliError::usage(format!(
            "There is already an existing repository at `{}`.",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            return Err(CliError::usage(format!(
                "The directory `{}` does not exist.",
                dir.display()
            )));
        }
    }
    Ok(path)
}

pub fn run_repo_init(value: &Path) -> Result<()> {
    let path = repo_path(value, false)?;
    init_repository(&path)?;
    Ok(())
}

pub fn run_repo_add(
    value: &Path,
    plugins: &[PathBuf],
    url: &str,
    plugin_urls: &[String],
) -> Result<()> {
    let path = repo_path(value, true)?;
    if let Some(missing) = plugins.iter().find(|p| !p.exists()) {
        return Err(CliError::usage(format!("No such file: `{}`", missing.display())));
    }

    add_plugins(&path, plugins, url, plugin_urls, &mut TracingSink)?;
    Ok(())
}

pub fn run_repo_list(value: &Path, plugin: Option<&str>) -> Result<()> {
    let path = repo_path(value, true)?;

    match plugin {
        Some(plugin) => {
            for version in list_versions(&path, plugin)? {
                println!("{version}");
            }
        }
        None => {
            let summaries = list_plugins(&path)?;
            if !summaries.is_empty() {
                print!("{}", render_table(&summaries));
            }
        }
    }
    Ok(())
}

pub fn run_repo_remove(value: &Path, plugin: &str, version: Option<&Version>) -> Result<()> {
    let path = repo_path(value, true)?;
    let removal = remove_plugin(&path, plugin, version)?;
    for line in removal.confirmations() {
        println!("{line}");
    }
    Ok(())
}

/// Plain table with a header row; VERSION is right-aligned.
fn render_table(rows: &[PluginSummary]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.version.clone(),
                r.slug.clone(),
                r.guid.to_string(),
            ]
        })
        .collect();

    let header = ["NAME", "VERSION", "SLUG", "GUID"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |row: [&str; 4]| {
        let line = format!(
            "{:<w0$}  {:>w1$}  {:<w2$}  {:<w3$}",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
        format!("{}\n", line.trim_end())
    };

    let mut out = format_row(header);
    for row in &cells {
        out.push_str(&format_row([&row[0], &row[1], &row[2], &row[3]]));
    }
    out
}
