//! Per-package metadata (`meta.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DEFAULT_IMAGE_FILE;
use crate::build_config::{BuildConfig, required};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::version::Version;

/// Descriptive record of one plugin build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub guid: Uuid,
    pub name: String,
    pub description: String,
    pub overview: String,
    pub owner: String,
    pub category: String,
    /// Always the four-part form.
    pub version: String,
    pub changelog: String,
    pub target_abi: String,
    /// ISO-8601 UTC, second precision, `Z` suffix.
    pub timestamp: String,
    /// Image file name, stored at the package root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Overrides for [`generate_metadata`].
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Version to stamp instead of the configured one.
    pub version: Option<String>,
    /// Build timestamp instead of the current time.
    pub timestamp: Option<String>,
    /// Project directory to resolve the image against.
    ///
    /// When unset the configured `image` value is copied verbatim.
    pub project_dir: Option<PathBuf>,
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse a GUID string into its canonical form.
pub fn parse_guid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|source| Error::InvalidGuid {
        value: value.to_string(),
        source,
    })
}

/// Locate the image that belongs in the package.
///
/// An explicitly configured image must exist. Otherwise the default image
/// file is used when present.
pub fn resolve_image(
    config: &BuildConfig,
    project_dir: &Path,
    sink: &mut dyn DiagnosticSink,
) -> Result<Option<PathBuf>> {
    if let Some(image) = &config.image {
        let path = project_dir.join(image);
        if !path.exists() {
            return Err(Error::ImageNotFound {
                image: image.clone(),
                path,
            });
        }
        return Ok(Some(path));
    }

    let path = project_dir.join(DEFAULT_IMAGE_FILE);
    if path.exists() {
        sink.emit(Diagnostic::ImageAutodetected { path: path.clone() });
        return Ok(Some(path));
    }

    Ok(None)
}

/// Build the metadata record for one build of the plugin described by `config`.
pub fn generate_metadata(
    config: &BuildConfig,
    options: &MetadataOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<PluginMetadata> {
    let version = match &options.version {
        Some(version) => version.as_str(),
        None => config.require_version()?,
    };
    let version = Version::parse(version)?.full();

    let timestamp = options.timestamp.clone().unwrap_or_else(timestamp_now);

    let guid = parse_guid(required(&config.guid, "guid")?)?;
    let name = required(&config.name, "name")?.to_string();
    let description = required(&config.description, "description")?.to_string();
    let overview = required(&config.overview, "overview")?.to_string();
    let owner = required(&config.owner, "owner")?.to_string();
    let category = required(&config.category, "category")?.to_string();
    let changelog = required(&config.changelog, "changelog")?.to_string();
    let target_abi = required(&config.target_abi, "targetAbi")?.to_string();

    let image = match &options.project_dir {
        Some(dir) => resolve_image(config, dir, sink)?.and_then(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }),
        None => config.image.clone(),
    };
    let image_url = config.image_url.clone();

    match (&image, &image_url) {
        (None, None) => sink.emit(Diagnostic::MissingImage),
        (Some(_), Some(_)) => sink.emit(Diagnostic::ImageAndImageUrl),
        _ => {}
    }

    Ok(PluginMetadata {
        guid,
        name,
        description,
        overview,
        owner,
        category,
        version,
        changelog,
        target_abi,
        timestamp,
        image,
        image_url,
    })
}

impl PluginMetadata {
    /// Render as `meta.json` content: sorted keys, 4-space indent.
    pub fn to_json(&self) -> serde_json::Result<String> {
        // Going through `Value` sorts the keys
        let value = serde_json::to_value(self)?;
        jprm_fs::config::to_json_pretty(&value)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use pretty_assertions::assert_eq;

    fn config() -> BuildConfig {
        BuildConfig {
            guid: Some("F5DDC434-4B42-45D0-A049-8DDA7F1ED30B".into()),
            name: Some("Plugin A".into()),
            description: Some("Long description".into()),
            overview: Some("Short description".into()),
            owner: Some("jellyfin".into()),
            category: Some("General".into()),
            version: Some("1.0".into()),
            changelog: Some("changelog".into()),
            target_abi: Some("10.6.0.0".into()),
            artifacts: vec!["dummy.dll".into()],
            ..BuildConfig::default()
        }
    }

    fn fixed_time() -> MetadataOptions {
        MetadataOptions {
            timestamp: Some("2020-01-01T00:00:00Z".into()),
            ..MetadataOptions::default()
        }
    }

    #[test]
    fn test_generate_copies_fields_and_normalizes() {
        let mut sink = CollectingSink::new();
        let meta = generate_metadata(&config(), &fixed_time(), &mut sink).unwrap();

        assert_eq!(meta.guid.to_string(), "f5ddc434-4b42-45d0-a049-8dda7f1ed30b");
        assert_eq!(meta.name, "Plugin A");
        assert_eq!(meta.version, "1.0.0.0");
        assert_eq!(meta.target_abi, "10.6.0.0");
        assert_eq!(meta.timestamp, "2020-01-01T00:00:00Z");
        assert_eq!(meta.image, None);
        assert_eq!(sink.diagnostics, vec![Diagnostic::MissingImage]);
    }

    #[test]
    fn test_explicit_version_wins() {
        let options = MetadataOptions {
            version: Some("5.0".into()),
            ..fixed_time()
        };
        let meta = generate_metadata(&config(), &options, &mut CollectingSink::new()).unwrap();
        assert_eq!(meta.version, "5.0.0.0");
    }

    #[test]
    fn test_invalid_version_fails() {
        let options = MetadataOptions {
            version: Some("1.2.3-beta.2".into()),
            ..fixed_time()
        };
        let result = generate_metadata(&config(), &options, &mut CollectingSink::new());
        assert!(matches!(result, Err(Error::InvalidVersionFormat { .. })));
    }

    #[test]
    fn test_missing_field_fails() {
        let mut cfg = config();
        cfg.target_abi = None;
        let result = generate_metadata(&cfg, &fixed_time(), &mut CollectingSink::new());
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField { field: "targetAbi" })
        ));
    }

    #[test]
    fn test_invalid_guid_fails() {
        let mut cfg = config();
        cfg.guid = Some("not-a-guid".into());
        let result = generate_metadata(&cfg, &fixed_time(), &mut CollectingSink::new());
        assert!(matches!(result, Err(Error::InvalidGuid { .. })));
    }

    #[test]
    fn test_default_timestamp_format() {
        let meta = generate_metadata(
            &config(),
            &MetadataOptions::default(),
            &mut CollectingSink::new(),
        )
        .unwrap();
        assert_eq!(meta.timestamp.len(), "2020-01-01T00:00:00Z".len());
        assert!(meta.timestamp.ends_with('Z'));
        assert!(chrono::NaiveDateTime::parse_from_str(&meta.timestamp, "%Y-%m-%dT%H:%M:%SZ").is_ok());
    }

    #[test]
    fn test_image_and_image_url_warns() {
        let mut cfg = config();
        cfg.image = Some("logo.png".into());
        cfg.image_url = Some("https://example.com/logo.png".into());
        let mut sink = CollectingSink::new();

        let meta = generate_metadata(&cfg, &fixed_time(), &mut sink).unwrap();

        assert_eq!(meta.image.as_deref(), Some("logo.png"));
        assert_eq!(sink.diagnostics, vec![Diagnostic::ImageAndImageUrl]);
    }

    #[test]
    fn test_image_url_only_is_quiet() {
        let mut cfg = config();
        cfg.image_url = Some("https://example.com/logo.png".into());
        let mut sink = CollectingSink::new();

        generate_metadata(&cfg, &fixed_time(), &mut sink).unwrap();

        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_project_dir_autodetects_default_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_IMAGE_FILE), b"png").unwrap();
        let options = MetadataOptions {
            project_dir: Some(dir.path().to_path_buf()),
            ..fixed_time()
        };
        let mut sink = CollectingSink::new();

        let meta = generate_metadata(&config(), &options, &mut sink).unwrap();

        assert_eq!(meta.image.as_deref(), Some("image.png"));
        assert!(sink.contains(&Diagnostic::ImageAutodetected {
            path: dir.path().join(DEFAULT_IMAGE_FILE)
        }));
    }

    #[test]
    fn test_project_dir_missing_explicit_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config();
        cfg.image = Some("assets/logo.png".into());
        let options = MetadataOptions {
            project_dir: Some(dir.path().to_path_buf()),
            ..fixed_time()
        };

        let result = generate_metadata(&cfg, &options, &mut CollectingSink::new());

        assert!(matches!(result, Err(Error::ImageNotFound { .. })));
    }

    #[test]
    fn test_project_dir_explicit_image_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/logo.png"), b"png").unwrap();
        let mut cfg = config();
        cfg.image = Some("assets/logo.png".into());
        let options = MetadataOptions {
            project_dir: Some(dir.path().to_path_buf()),
            ..fixed_time()
        };

        let meta = generate_metadata(&cfg, &options, &mut CollectingSink::new()).unwrap();

        assert_eq!(meta.image.as_deref(), Some("logo.png"));
    }

    #[test]
    fn test_json_keys_sorted() {
        let meta = generate_metadata(&config(), &fixed_time(), &mut CollectingSink::new()).unwrap();
        let json = meta.to_json().unwrap();

        let category = json.find("\"category\"").unwrap();
        let timestamp = json.find("\"timestamp\"").unwrap();
        assert!(category < timestamp);
        assert!(json.contains("\n    \"guid\": \"f5ddc434-4b42-45d0-a049-8dda7f1ed30b\""));
        assert_eq!(PluginMetadata::from_json(&json).unwrap(), meta);
    }
}
