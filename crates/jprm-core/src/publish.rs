//! Repository operations: init, add, list and remove.
//!
//! Every operation takes the path of the manifest file itself. Callers
//! resolve directory arguments with [`jprm_meta::resolve_manifest_path`].

use std::path::{Component, Path, PathBuf};

use jprm_fs::{archive, io};
use jprm_meta::{
    DiagnosticSink, PluginQuery, PluginSummary, Removal, RepositoryManifest, Upsert, Version,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::package::manifest_entry_from_package;

/// One package folded into the repository by [`add_plugins`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedPlugin {
    pub guid: Uuid,
    pub name: String,
    pub version: String,
    pub upsert: Upsert,
    /// Where the archive was copied, `None` when a plugin URL was given.
    pub copied_to: Option<PathBuf>,
}

/// Create an empty repository manifest.
pub fn init_repository(manifest_path: &Path) -> Result<RepositoryManifest> {
    Ok(RepositoryManifest::init(manifest_path)?)
}

fn repo_dir(manifest_path: &Path) -> &Path {
    manifest_path.parent().unwrap_or(Path::new(""))
}

/// Images are written next to the archive, so their name must be a single
/// normal path component.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Add packages to the repository.
///
/// `plugin_urls` is either empty or holds one URL per package. Packages
/// without a URL are copied to `{repo_dir}/{slug}/{slug}_{version}.zip`;
/// packaged images are placed next to them in every case.
pub fn add_plugins(
    manifest_path: &Path,
    plugins: &[PathBuf],
    repo_url: &str,
    plugin_urls: &[String],
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<AddedPlugin>> {
    let mut manifest = RepositoryManifest::load(manifest_path)?;

    if let Some(bad) = plugins.iter().find(|p| !archive::is_zip(p)) {
        return Err(Error::NotAPackage { path: bad.clone() });
    }
    if !plugin_urls.is_empty() && plugin_urls.len() != plugins.len() {
        return Err(Error::PluginUrlCount {
            plugins: plugins.len(),
            urls: plugin_urls.len(),
        });
    }

    let mut added = Vec::with_capacity(plugins.len());
    for (i, plugin_file) in plugins.iter().enumerate() {
        tracing::info!("Processing {}", plugin_file.display());
        let plugin_url = plugin_urls.get(i).map(String::as_str);

        let entry = manifest_entry_from_package(plugin_file, repo_url, plugin_url, sink)?;
        tracing::debug!("{:?}", entry);

        if let Some(image) = entry.image.as_deref().filter(|i| !is_plain_file_name(i)) {
            return Err(Error::InvalidImagePath {
                image: image.to_string(),
                path: plugin_file.clone(),
            });
        }

        let slug = entry.slug();
        let version = entry
            .versions
            .first()
            .map(|r| r.version.clone())
            .unwrap_or_default();
        let plugin_dir = repo_dir(manifest_path).join(&slug);

        tracing::info!(
            "Adding {} version {} to {}",
            entry.name,
            version,
            manifest_path.display()
        );

        let copied_to = if plugin_url.is_some() {
            tracing::warn!("Plugin url is specified, we are NOT copying the plugin file to the repo.");
            None
        } else {
            let target = plugin_dir.join(format!("{slug}_{version}.zip"));
            tracing::info!("Copying {} to {}", plugin_file.display(), target.display());
            io::copy_file(plugin_file, &target)?;
            Some(target)
        };

        if let Some(image) = &entry.image {
            if let Some(data) = archive::read_entry(plugin_file, image)? {
                tracing::info!("Read image from `{}:{}`", plugin_file.display(), image);
                io::write_if_changed(&plugin_dir.join(image), &data)?;
            }
        }

        let guid = entry.guid;
        let name = entry.name.clone();
        let upsert = manifest.upsert(entry)?;
        added.push(AddedPlugin {
            guid,
            name,
            version,
            upsert,
            copied_to,
        });
    }

    tracing::debug!("Writing repo manifest to {}", manifest_path.display());
    manifest.save(manifest_path)?;
    Ok(added)
}

/// One summary row per plugin.
pub fn list_plugins(manifest_path: &Path) -> Result<Vec<PluginSummary>> {
    Ok(RepositoryManifest::load(manifest_path)?.summaries())
}

/// Every version of one plugin, in manifest order.
pub fn list_versions(manifest_path: &Path, plugin: &str) -> Result<Vec<String>> {
    let manifest = RepositoryManifest::load(manifest_path)?;
    let entry = manifest
        .find(&PluginQuery::new(plugin))
        .ok_or_else(|| Error::PluginNotFound {
            plugin: plugin.to_string(),
            path: manifest_path.to_path_buf(),
        })?;
    Ok(entry.versions.iter().map(|r| r.version.clone()).collect())
}

/// Remove a plugin, or a single version of it, and save the manifest.
pub fn remove_plugin(
    manifest_path: &Path,
    plugin: &str,
    version: Option<&Version>,
) -> Result<Removal> {
    let mut manifest = RepositoryManifest::load(manifest_path)?;
    let removal = manifest
        .remove(&PluginQuery::new(plugin), version)
        .ok_or_else(|| Error::PluginNotFound {
            plugin: plugin.to_string(),
            path: manifest_path.to_path_buf(),
        })?;
    manifest.save(manifest_path)?;
    Ok(removal)
}
