//! End-to-end pipeline: package a plugin, publish it, list it, remove it.
//!
//! Exercises jprm-core, jprm-meta and jprm-fs together on a real directory
//! layout, the way a release job would drive them.

use std::path::{Path, PathBuf};

use jprm_core::{
    PackageOptions, add_plugins, init_repository, list_plugins, list_versions, package_plugin,
    remove_plugin,
};
use jprm_fs::checksum;
use jprm_meta::{
    BuildConfig, CollectingSink, Diagnostic, RepositoryManifest, Version, resolve_manifest_path,
};
use jprm_test_utils::{PLUGIN_A_GUID, TestProject};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn package(project: &TestProject, version: &str) -> PathBuf {
    let (_, config) = BuildConfig::discover(project.root()).unwrap();
    package_plugin(
        project.root(),
        &config,
        &PackageOptions {
            version: Some(version.to_string()),
            binary_path: Some(project.bin_dir()),
            output: Some(project.root().join("artifacts")),
            timestamp: Some("2020-01-01T00:00:00Z".into()),
        },
        &mut CollectingSink::new(),
    )
    .unwrap()
}

fn publish(manifest: &Path, archives: &[PathBuf]) -> CollectingSink {
    let mut sink = CollectingSink::new();
    add_plugins(manifest, archives, "https://repo.example.com/", &[], &mut sink).unwrap();
    sink
}

#[test]
fn test_release_pipeline() {
    let project = TestProject::new()
        .with_config("Plugin A", "1.0")
        .with_binary("dummy.dll", b"binary")
        .with_image("image.png", b"png");
    let repo = TempDir::new().unwrap();
    let manifest = resolve_manifest_path(repo.path());
    init_repository(&manifest).unwrap();

    let first = package(&project, "1.0");
    let second = package(&project, "1.1");
    assert!(checksum::verify_checksum_file(&checksum::sidecar_path(&second)).unwrap());

    let sink = publish(&manifest, &[first, second.clone()]);
    assert!(sink.warnings().next().is_none());

    // Both builds are in the repository, newest first
    assert_eq!(
        list_versions(&manifest, PLUGIN_A_GUID).unwrap(),
        vec!["1.1.0.0", "1.0.0.0"]
    );
    assert!(repo.path().join("plugin-a/plugin-a_1.0.0.0.zip").is_file());
    assert!(repo.path().join("plugin-a/plugin-a_1.1.0.0.zip").is_file());
    assert_eq!(std::fs::read(repo.path().join("plugin-a/image.png")).unwrap(), b"png");

    let stored = RepositoryManifest::load(&manifest).unwrap();
    let entry = &stored.entries[0];
    assert_eq!(
        entry.image_url.as_deref(),
        Some("https://repo.example.com/plugin-a/image.png")
    );
    assert_eq!(
        entry.versions[0].source_url.as_deref(),
        Some("https://repo.example.com/plugin-a/plugin-a_1.1.0.0.zip")
    );
    assert_eq!(
        entry.versions[0].checksum,
        Some(checksum::compute_file_checksum(&second).unwrap())
    );

    // Republishing the same build changes nothing
    let before = std::fs::read_to_string(&manifest).unwrap();
    publish(&manifest, &[second]);
    assert_eq!(std::fs::read_to_string(&manifest).unwrap(), before);

    let summaries = list_plugins(&manifest).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].version, "1.1.0.0");

    let removal = remove_plugin(&manifest, "plugin-a", Some(&Version::parse("1.1").unwrap())).unwrap();
    assert_eq!(
        removal.confirmations(),
        vec![format!("removed {PLUGIN_A_GUID} 1.1.0.0")]
    );
    assert_eq!(list_versions(&manifest, "Plugin A").unwrap(), vec!["1.0.0.0"]);

    remove_plugin(&manifest, PLUGIN_A_GUID, None).unwrap();
    assert!(list_plugins(&manifest).unwrap().is_empty());
}

#[test]
fn test_manifest_written_with_four_space_indent() {
    let project = TestProject::new()
        .with_config("Plugin A", "1.0")
        .with_binary("dummy.dll", b"binary");
    let repo = TempDir::new().unwrap();
    let manifest = repo.path().join("manifest.json");
    init_repository(&manifest).unwrap();

    let sink = publish(&manifest, &[package(&project, "1.0")]);
    assert!(sink.contains(&Diagnostic::MissingImage));

    let content = std::fs::read_to_string(&manifest).unwrap();
    assert!(content.starts_with("[\n    {\n        \"guid\": "));
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed[0]["guid"], PLUGIN_A_GUID);
    assert!(parsed[0].get("imageUrl").is_none());
}
