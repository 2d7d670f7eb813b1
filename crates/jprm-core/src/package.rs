//! Packaging built plugins into distributable archives, and reading them back.

use std::path::{Path, PathBuf};

use jprm_fs::{archive, checksum, io};
use jprm_meta::{
    BuildConfig, DiagnosticSink, JSON_METADATA_FILE, MetadataOptions, PluginManifestEntry,
    PluginMetadata, Version, generate_manifest_entry, generate_metadata, resolve_image, slugify,
};

use crate::error::{Error, Result};

/// Binary directory used when none is given.
pub const DEFAULT_BINARY_PATH: &str = "./bin/";

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_PATH: &str = "./artifacts/";

/// Options for [`package_plugin`].
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Version to package instead of the configured one.
    pub version: Option<String>,
    /// Directory holding the build outputs.
    pub binary_path: Option<PathBuf>,
    /// Directory receiving the archive and its sidecars.
    pub output: Option<PathBuf>,
    /// Build timestamp instead of the current time.
    pub timestamp: Option<String>,
}

/// Archive file name for a plugin build.
pub fn archive_name(name: &str, version: &str) -> String {
    format!("{}_{}.zip", slugify(name), version)
}

/// `{archive}.meta.json`
pub fn metadata_sidecar_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(".");
    name.push(JSON_METADATA_FILE);
    PathBuf::from(name)
}

/// Package the build outputs of the plugin at `path`.
///
/// Writes `{output}/{slug}_{version}.zip` together with its `.md5sum` and
/// `.meta.json` sidecars and returns the archive path.
pub fn package_plugin(
    path: &Path,
    config: &BuildConfig,
    options: &PackageOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<PathBuf> {
    let binary_path = options
        .binary_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY_PATH));
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    let image_path = resolve_image(config, path, sink)?;

    // The package stores the image at its root, under its file name
    let mut config = config.clone();
    let image_name = image_path
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned());
    if image_name.is_some() {
        config.image = image_name.clone();
    }

    let version = match &options.version {
        Some(version) => Some(Version::parse(version)?.full()),
        None => None,
    };
    let metadata = generate_metadata(
        &config,
        &MetadataOptions {
            version,
            timestamp: options.timestamp.clone(),
            project_dir: None,
        },
        sink,
    )?;

    std::fs::create_dir_all(&output).map_err(|e| jprm_fs::Error::io(&output, e))?;
    let archive_path = output.join(archive_name(&metadata.name, &metadata.version));

    let staging = tempfile::tempdir().map_err(|e| jprm_fs::Error::io(std::env::temp_dir(), e))?;

    for artifact in &config.artifacts {
        let source = binary_path.join(artifact);
        if !source.is_file() {
            return Err(Error::ArtifactNotFound {
                artifact: artifact.clone(),
                path: source,
            });
        }
        io::copy_file(&source, &staging.path().join(artifact))?;
    }

    if let (Some(image_path), Some(image_name)) = (&image_path, &image_name) {
        io::copy_file(image_path, &staging.path().join(image_name))?;
    }

    let meta_json = metadata.to_json().map_err(|source| Error::InvalidMetadata {
        path: staging.path().join(JSON_METADATA_FILE),
        source,
    })?;
    let staged_meta = staging.path().join(JSON_METADATA_FILE);
    std::fs::write(&staged_meta, &meta_json).map_err(|e| jprm_fs::Error::io(&staged_meta, e))?;

    archive::zip_directory(&archive_path, staging.path())?;
    let md5 = checksum::write_checksum_file(&archive_path)?;
    io::write_atomic(&metadata_sidecar_path(&archive_path), meta_json.as_bytes())?;

    tracing::info!("Packaged {} ({})", archive_path.display(), md5);
    Ok(archive_path)
}

fn parse_metadata(path: &Path, content: &[u8]) -> Result<PluginMetadata> {
    serde_json::from_slice(content).map_err(|source| Error::InvalidMetadata {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the metadata of a package.
///
/// The `.meta.json` sidecar is preferred over the `meta.json` stored inside
/// the archive.
pub fn read_package_metadata(archive_path: &Path) -> Result<PluginMetadata> {
    let sidecar = metadata_sidecar_path(archive_path);
    if sidecar.exists() {
        let content = io::read_text(&sidecar)?;
        tracing::info!("Read meta from `{}`", sidecar.display());
        return parse_metadata(&sidecar, content.as_bytes());
    }

    if let Some(content) = archive::read_entry(archive_path, JSON_METADATA_FILE)? {
        tracing::info!("Read meta from `{}:{}`", archive_path.display(), JSON_METADATA_FILE);
        return parse_metadata(archive_path, &content);
    }

    Err(Error::MetadataNotFound {
        path: archive_path.to_path_buf(),
    })
}

/// Build the repository manifest entry describing a package.
pub fn manifest_entry_from_package(
    archive_path: &Path,
    repo_url: &str,
    plugin_url: Option<&str>,
    sink: &mut dyn DiagnosticSink,
) -> Result<PluginManifestEntry> {
    let metadata = read_package_metadata(archive_path)?;
    let md5 = checksum::compute_file_checksum(archive_path)?;
    Ok(generate_manifest_entry(&metadata, repo_url, plugin_url, &md5, sink))
}
