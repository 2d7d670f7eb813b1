//! Repository manifest entries.
//!
//! One [`PluginManifestEntry`] per plugin, each carrying the history of
//! published builds as [`VersionRecord`]s. Unknown keys survive a
//! load/save round trip at both levels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::metadata::PluginMetadata;
use crate::slug::slugify;

/// One published build of a plugin.
///
/// Only `version` is mandatory. Older manifests may lack the other fields,
/// and they stay absent when the manifest is written back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_abi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One plugin in the repository manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifestEntry {
    pub guid: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PluginManifestEntry {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Build the single-version manifest entry for a packaged plugin.
///
/// The source URL is `{repo_url}/{slug}/{slug}_{version}.zip` unless
/// `plugin_url` overrides it. When the metadata names an image, the image
/// URL always points next to the package in the repository.
pub fn generate_manifest_entry(
    metadata: &PluginMetadata,
    repo_url: &str,
    plugin_url: Option<&str>,
    checksum: &str,
    sink: &mut dyn DiagnosticSink,
) -> PluginManifestEntry {
    let plugin_url = plugin_url.filter(|url| !url.is_empty());
    if repo_url.is_empty() && plugin_url.is_none() {
        sink.emit(Diagnostic::MissingRepositoryUrl);
    }

    let base = repo_url.trim_end_matches('/');
    let slug = slugify(&metadata.name);

    let mut source_url = format!("{base}/{slug}/{slug}_{}.zip", metadata.version);
    if let Some(plugin_url) = plugin_url {
        sink.emit(Diagnostic::PluginUrlOverride {
            plugin_url: plugin_url.to_string(),
            generated: source_url,
        });
        source_url = plugin_url.to_string();
    }

    let mut image_url = metadata.image_url.clone();
    if let Some(image) = &metadata.image {
        let derived = format!("{base}/{slug}/{image}");
        if let Some(previous) = image_url.take() {
            sink.emit(Diagnostic::ImageUrlOverridden {
                previous,
                derived: derived.clone(),
            });
        }
        image_url = Some(derived);
    } else if image_url.is_none() {
        sink.emit(Diagnostic::MissingImage);
    }

    PluginManifestEntry {
        guid: metadata.guid,
        name: metadata.name.clone(),
        description: metadata.description.clone(),
        overview: metadata.overview.clone(),
        owner: metadata.owner.clone(),
        category: metadata.category.clone(),
        versions: vec![VersionRecord {
            version: metadata.version.clone(),
            changelog: Some(metadata.changelog.clone()),
            target_abi: Some(metadata.target_abi.clone()),
            source_url: Some(source_url),
            checksum: Some(checksum.to_string()),
            timestamp: Some(metadata.timestamp.clone()),
            extra: serde_json::Map::new(),
        }],
        image_url,
        image: metadata.image.clone(),
        extra: serde_json::Map::new(),
    }
}
