//! The repository manifest: the JSON array of every published plugin.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DEFAULT_REPOSITORY_FILE;
use crate::error::{Error, Result};
use crate::manifest::PluginManifestEntry;
use crate::merge::merge_entry;
use crate::slug::slugify;
use crate::version::Version;

/// Resolve a repository argument to the manifest file path.
///
/// Anything not ending in `.json` is treated as a directory holding
/// `manifest.json`.
pub fn resolve_manifest_path(value: &Path) -> PathBuf {
    let is_json = value
        .to_str()
        .is_some_and(|s| s.ends_with(".json"));
    if is_json {
        value.to_path_buf()
    } else {
        value.join(DEFAULT_REPOSITORY_FILE)
    }
}

/// How a plugin lookup string resolves against manifest entries.
///
/// Accepts a GUID in any form `uuid` parses, the exact display name, or
/// the slug of the display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginQuery {
    raw: String,
    guid: Option<Uuid>,
}

impl PluginQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let guid = Uuid::parse_str(&raw).ok();
        Self { raw, guid }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, entry: &PluginManifestEntry) -> bool {
        self.guid == Some(entry.guid) || entry.name == self.raw || slugify(&entry.name) == self.raw
    }
}

/// Result of inserting an entry into the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Merged into the existing entry with the same GUID.
    Merged,
    /// Appended as a new plugin.
    Added,
}

/// What a removal actually removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The whole plugin entry.
    Plugin { guid: Uuid, name: String },
    /// Version records of one plugin; `count` may be zero.
    Versions {
        guid: Uuid,
        name: String,
        version: String,
        count: usize,
    },
}

impl Removal {
    /// One confirmation line per removed item.
    pub fn confirmations(&self) -> Vec<String> {
        match self {
            Self::Plugin { guid, .. } => vec![format!("removed {guid}")],
            Self::Versions {
                guid,
                version,
                count,
                ..
            } => (0..*count)
                .map(|_| format!("removed {guid} {version}"))
                .collect(),
        }
    }
}

/// Summary row for listing plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSummary {
    pub name: String,
    /// Highest published version, empty when there is none.
    pub version: String,
    pub slug: String,
    pub guid: Uuid,
}

/// Ordered list of plugin entries, unique by GUID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RepositoryManifest {
    pub entries: Vec<PluginManifestEntry>,
}

impl RepositoryManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty repository manifest at `path`.
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(Error::RepositoryAlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let manifest = Self::new();
        manifest.save(path)?;
        tracing::info!("Initialized `{}`.", path.display());
        Ok(manifest)
    }

    /// Load the repository manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::RepositoryNotFound {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!("Reading repo manifest from {}", path.display());
        Ok(jprm_fs::ConfigStore::new().load(path)?)
    }

    /// Atomically replace the manifest at `path` with this one.
    pub fn save(&self, path: &Path) -> Result<()> {
        Ok(jprm_fs::ConfigStore::new().save(path, self)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `entry` into the plugin with the same GUID, or append it.
    pub fn upsert(&mut self, entry: PluginManifestEntry) -> Result<Upsert> {
        match self.entries.iter().position(|e| e.guid == entry.guid) {
            Some(index) => {
                let merged = merge_entry(self.entries[index].clone(), entry)?;
                self.entries[index] = merged;
                Ok(Upsert::Merged)
            }
            None => {
                self.entries.push(entry);
                Ok(Upsert::Added)
            }
        }
    }

    fn position(&self, query: &PluginQuery) -> Option<usize> {
        self.entries.iter().position(|e| query.matches(e))
    }

    /// First entry matching `query`.
    pub fn find(&self, query: &PluginQuery) -> Option<&PluginManifestEntry> {
        self.position(query).map(|i| &self.entries[i])
    }

    /// Remove a plugin, or only its records for `version`.
    ///
    /// Returns `None` when no plugin matches. A version that matches no
    /// record is not an error: the result reports a count of zero.
    pub fn remove(&mut self, query: &PluginQuery, version: Option<&Version>) -> Option<Removal> {
        let index = self.position(query)?;

        let Some(version) = version else {
            let entry = self.entries.remove(index);
            tracing::warn!("Removing plugin {}", entry.name);
            return Some(Removal::Plugin {
                guid: entry.guid,
                name: entry.name,
            });
        };

        let full = version.full();
        let entry = &mut self.entries[index];
        let before = entry.versions.len();
        entry.versions.retain(|record| record.version != full);
        let count = before - entry.versions.len();

        if count > 0 {
            tracing::warn!("Removing version {} of plugin {}", version, entry.name);
        }

        Some(Removal::Versions {
            guid: entry.guid,
            name: entry.name.clone(),
            version: full,
            count,
        })
    }

    /// One row per plugin with its highest version.
    pub fn summaries(&self) -> Vec<PluginSummary> {
        self.entries
            .iter()
            .map(|entry| {
                let version = entry
                    .versions
                    .iter()
                    .filter_map(|r| Version::parse(&r.version).ok().map(|v| (v, &r.version)))
                    .max_by(|a, b| a.0.cmp(&b.0))
                    .map(|(_, raw)| raw.clone())
                    .unwrap_or_default();
                PluginSummary {
                    name: entry.name.clone(),
                    version,
                    slug: entry.slug(),
                    guid: entry.guid,
                }
            })
            .collect()
    }
}
