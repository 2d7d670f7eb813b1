//! Merging a freshly built plugin entry into its repository history.

use std::collections::HashSet;

use crate::error::Result;
use crate::manifest::{PluginManifestEntry, VersionRecord};
use crate::version::Version;

/// Merge `incoming` into `existing`.
///
/// - descriptive fields of `incoming` replace those of `existing`; optional
///   fields and unknown keys are only replaced when `incoming` has them
/// - existing version strings are upgraded to the four-part form
/// - existing records whose version string equals an incoming one are dropped
/// - the incoming records are appended and the list sorted by version,
///   newest first
///
/// Merging the same incoming version twice yields a single record for it.
pub fn merge_entry(
    existing: PluginManifestEntry,
    incoming: PluginManifestEntry,
) -> Result<PluginManifestEntry> {
    let PluginManifestEntry {
        guid,
        name,
        description,
        overview,
        owner,
        category,
        versions: new_versions,
        image_url,
        image,
        extra,
    } = incoming;

    let mut merged = existing;
    let old_versions = std::mem::take(&mut merged.versions);

    merged.guid = guid;
    merged.name = name;
    merged.description = description;
    merged.overview = overview;
    merged.owner = owner;
    merged.category = category;
    if image_url.is_some() {
        merged.image_url = image_url;
    }
    if image.is_some() {
        merged.image = image;
    }
    merged.extra.extend(extra);

    let incoming_versions: HashSet<&str> =
        new_versions.iter().map(|r| r.version.as_str()).collect();

    let mut keyed: Vec<(Version, VersionRecord)> = Vec::with_capacity(old_versions.len() + new_versions.len());
    for mut record in old_versions {
        let version = Version::parse(&record.version)?;
        record.version = version.full();
        if !incoming_versions.contains(record.version.as_str()) {
            keyed.push((version, record));
        }
    }
    for record in new_versions {
        keyed.push((Version::parse(&record.version)?, record));
    }

    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    merged.versions = keyed.into_iter().map(|(_, record)| record).collect();

    Ok(merged)
}
