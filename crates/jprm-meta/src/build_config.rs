//! Build configuration (`jprm.yaml`) discovery and parsing.
//!
//! # Example YAML
//!
//! ```yaml
//! name: "Plugin A"
//! guid: "f5ddc434-4b42-45d0-a049-8dda7f1ed30b"
//! version: "1.0.0.0"
//! targetAbi: "10.6.0.0"
//! framework: "net5.0"
//! owner: "jellyfin"
//! overview: "Short description"
//! description: "Long description"
//! category: "General"
//! artifacts:
//!   - "Jellyfin.Plugin.A.dll"
//! changelog: "Initial release"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::CONFIG_LOCATIONS;
use crate::error::{Error, Result};

/// Per-plugin build configuration.
///
/// Every field is optional at parse time; metadata generation reports the
/// first missing required field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// String or integer in YAML.
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_abi: Option<String>,
    /// Target framework passed to the toolchain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Image path relative to the project directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Build outputs to package, relative to the binary directory.
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Keys this tool does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(u64),
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    }))
}

/// Return the value of a required field or report it missing.
pub(crate) fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or(Error::MissingRequiredField { field })
}

impl BuildConfig {
    /// Parse a build config from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(jprm_fs::ConfigStore::new().parse(Path::new("jprm.yaml"), content)?)
    }

    /// Read and parse a build config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(jprm_fs::ConfigStore::new().load(path)?)
    }

    /// Locate and load the build config of the project at `dir`.
    ///
    /// Candidates from [`CONFIG_LOCATIONS`] are tried in order. A candidate
    /// that fails to parse is logged and skipped.
    pub fn discover(dir: &Path) -> Result<(PathBuf, Self)> {
        for location in CONFIG_LOCATIONS {
            let candidate = dir.join(location);
            if !candidate.exists() {
                continue;
            }

            match Self::from_path(&candidate) {
                Ok(config) => {
                    tracing::debug!("Loaded build config from {}", candidate.display());
                    return Ok((candidate, config));
                }
                Err(e) => {
                    tracing::error!("Failed to load YAML manifest {}: {}", candidate.display(), e);
                }
            }
        }

        tracing::warn!("Failed to locate config file.");
        Err(Error::ConfigNotFound {
            path: dir.to_path_buf(),
        })
    }

    /// Plugin name, required for everything that derives a slug.
    pub fn require_name(&self) -> Result<&str> {
        required(&self.name, "name")
    }

    /// Declared version, required when none is passed explicitly.
    pub fn require_version(&self) -> Result<&str> {
        required(&self.version, "version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
name: "Plugin A"
guid: "f5ddc434-4b42-45d0-a049-8dda7f1ed30b"
version: "1.0.0.0"
targetAbi: "10.6.0.0"
framework: "net5.0"
owner: "jellyfin"
overview: "Short description"
description: "Long description"
category: "General"
artifacts:
  - "dummy.dll"
changelog: |
  - first release
"#;

    #[test]
    fn test_from_yaml() {
        let config = BuildConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.name.as_deref(), Some("Plugin A"));
        assert_eq!(config.target_abi.as_deref(), Some("10.6.0.0"));
        assert_eq!(config.framework.as_deref(), Some("net5.0"));
        assert_eq!(config.artifacts, vec!["dummy.dll".to_string()]);
        assert_eq!(config.changelog.as_deref(), Some("- first release\n"));
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_integer_version() {
        let config = BuildConfig::from_yaml("name: x\nversion: 5\n").unwrap();
        assert_eq!(config.version.as_deref(), Some("5"));
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let config = BuildConfig::from_yaml("name: x\nsupportUrl: https://example.com\n").unwrap();
        assert_eq!(
            config.extra.get("supportUrl"),
            Some(&serde_json::Value::String("https://example.com".into()))
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(BuildConfig::from_yaml("]]]").is_err());
    }

    #[test]
    fn test_required_fields() {
        let config = BuildConfig::default();
        assert!(matches!(
            config.require_name(),
            Err(Error::MissingRequiredField { field: "name" })
        ));
    }
}
