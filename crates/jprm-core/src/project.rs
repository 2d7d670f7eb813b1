//! Locating dotnet project files and stamping version and framework into them.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::error::{Error, Result};

static SOLUTION_PROJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*Project\("[^"]*"\)\s*=\s*"(?P<name>[^"]*)",\s*"(?P<file>[^"]+proj)",\s*"[^"]*"\s*"#)
        .expect("Invalid solution project regex")
});

static VERSION_TAGS: LazyLock<[(&'static str, Regex); 3]> = LazyLock::new(|| {
    ["Version", "FileVersion", "AssemblyVersion"].map(|tag| (tag, tag_regex(tag)))
});

static FRAMEWORK_TAG: LazyLock<Regex> = LazyLock::new(|| tag_regex("TargetFramework"));

fn tag_regex(tag: &str) -> Regex {
    Regex::new(&format!("<{tag}>(?P<value>.*?)</{tag}>")).expect("Invalid project tag regex")
}

/// Shared MSBuild properties picked up alongside the project files.
pub const DIRECTORY_BUILD_PROPS: &str = "Directory.Build.props";

/// Project files referenced by a solution, relative to the solution's directory.
pub fn solution_projects(solution: &Path) -> Result<Vec<PathBuf>> {
    let content = jprm_fs::io::read_text(solution)?;
    let dir = solution.parent().unwrap_or(Path::new(""));

    Ok(SOLUTION_PROJECT
        .captures_iter(&content)
        .map(|caps| {
            let file = caps["file"].replace('\\', "/");
            dir.join(file)
        })
        .collect())
}

/// Files to rewrite before building the plugin in `dir`.
///
/// The first solution file wins and contributes every project it lists.
/// Without one, the first C# project file is used. `Directory.Build.props`
/// is appended when present.
pub fn find_project_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| jprm_fs::Error::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let has_extension = |path: &Path, ext: &str| path.extension().is_some_and(|e| e == ext);

    let mut projects = if let Some(solution) = files.iter().find(|p| has_extension(p, "sln")) {
        tracing::debug!("Using solution {}", solution.display());
        solution_projects(solution)?
    } else if let Some(project) = files.iter().find(|p| has_extension(p, "csproj")) {
        vec![project.clone()]
    } else {
        Vec::new()
    };

    let props = dir.join(DIRECTORY_BUILD_PROPS);
    if props.exists() {
        projects.push(props);
    }

    if projects.is_empty() {
        return Err(Error::ProjectNotFound {
            path: dir.to_path_buf(),
        });
    }
    Ok(projects)
}

/// Replace the value of every `tag` in `content`.
///
/// Returns `None` when a tag occurs more than once.
fn replace_tags(content: &str, tags: &[(&str, &Regex)], value: &str) -> Option<String> {
    if tags.iter().any(|(_, re)| re.find_iter(content).count() > 1) {
        return None;
    }

    let mut content = content.to_string();
    for (tag, re) in tags {
        if let Some(caps) = re.captures(&content) {
            tracing::debug!("Old {}: {}", tag, &caps["value"]);
        }
        let replacement = format!("<{tag}>{value}</{tag}>");
        content = re.replace_all(&content, NoExpand(&replacement)).into_owned();
    }
    Some(content)
}

/// Set `<Version>`, `<FileVersion>` and `<AssemblyVersion>` in `content`.
pub fn replace_version(content: &str, version: &str) -> Option<String> {
    let tags: Vec<(&str, &Regex)> = VERSION_TAGS.iter().map(|(t, re)| (*t, re)).collect();
    replace_tags(content, &tags, version)
}

/// Set `<TargetFramework>` in `content`.
pub fn replace_framework(content: &str, framework: &str) -> Option<String> {
    replace_tags(content, &[("TargetFramework", &*FRAMEWORK_TAG)], framework)
}

fn rewrite(path: &Path, edit: impl Fn(&str) -> Option<String>, what: &str) -> Result<bool> {
    let content = jprm_fs::io::read_text(path)?;
    match edit(&content) {
        Some(updated) => {
            if updated != content {
                jprm_fs::io::write_atomic(path, updated.as_bytes())?;
            }
            Ok(true)
        }
        None => {
            tracing::error!(
                "Found multiple instances of the {} tag(s) in {}, bailing.",
                what,
                path.display()
            );
            Ok(false)
        }
    }
}

/// Stamp `version` into a project file. Returns `false` if the file was left alone.
pub fn set_project_version(path: &Path, version: &str) -> Result<bool> {
    tracing::info!("Setting project version to {version}");
    rewrite(path, |c| replace_version(c, version), "version")
}

/// Stamp `framework` into a project file. Returns `false` if the file was left alone.
pub fn set_project_framework(path: &Path, framework: &str) -> Result<bool> {
    tracing::info!("Setting project framework to {framework}");
    rewrite(path, |c| replace_framework(c, framework), "TargetFramework")
}
