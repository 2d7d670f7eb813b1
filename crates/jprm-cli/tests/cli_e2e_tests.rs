//! End-to-end tests that invoke the compiled `jprm` binary.

use assert_cmd::Command;
use assert_fs::prelude::*;
use jprm_test_utils::{PLUGIN_A_GUID, PLUGIN_B_GUID, PackageFixture, TestProject, plugin_meta};
use predicates::prelude::*;

fn jprm_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("jprm"))
}

/// A temp dir with an initialized repository in `repo/`.
fn repo() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("repo").create_dir_all().unwrap();
    jprm_cmd()
        .args(["repo", "init"])
        .arg(temp.child("repo").path())
        .assert()
        .success();
    temp
}

fn add_package(temp: &assert_fs::TempDir, guid: &str, name: &str, version: &str) {
    let package = PackageFixture::new(plugin_meta(guid, name, version))
        .write(&temp.child(format!("incoming/{version}.zip")).path().to_path_buf());
    jprm_cmd()
        .args(["repo", "add"])
        .arg(temp.child("repo").path())
        .arg(package)
        .args(["--url", "https://repo.example.com"])
        .assert()
        .success();
}

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn test_help_output() {
    jprm_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plugin"))
        .stdout(predicate::str::contains("repo"));
}

#[test]
fn test_version_output() {
    jprm_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jprm"));
}

// ============================================================================
// repo init
// ============================================================================

#[test]
fn test_init_repo_directory() {
    let temp = repo();
    temp.child("repo/manifest.json").assert(predicate::path::is_file());
    temp.child("repo/manifest.json")
        .assert(predicate::str::starts_with("[]"));
}

#[test]
fn test_init_repo_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    jprm_cmd()
        .args(["repo", "init"])
        .arg(temp.child("foo.json").path())
        .assert()
        .success();
    temp.child("foo.json").assert(predicate::path::is_file());
    temp.child("manifest.json").assert(predicate::path::missing());
}

#[test]
fn test_double_init_is_usage_error() {
    let temp = repo();
    jprm_cmd()
        .args(["repo", "init"])
        .arg(temp.child("repo").path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already an existing repository"));
}

// ============================================================================
// repo add / list / remove
// ============================================================================

#[test]
fn test_add_and_list() {
    let temp = repo();
    add_package(&temp, PLUGIN_A_GUID, "Plugin A", "1.0.0.0");
    add_package(&temp, PLUGIN_A_GUID, "Plugin A", "1.1.0.0");
    add_package(&temp, PLUGIN_B_GUID, "Plugin B", "2.0.0.0");

    temp.child("repo/plugin-a/plugin-a_1.0.0.0.zip")
        .assert(predicate::path::is_file());
    temp.child("repo/plugin-a/plugin-a_1.1.0.0.zip")
        .assert(predicate::path::is_file());

    jprm_cmd()
        .args(["repo", "list"])
        .arg(temp.child("repo").path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NAME"))
        .stdout(predicate::str::contains(format!(
            "Plugin A  1.1.0.0  plugin-a  {PLUGIN_A_GUID}"
        )))
        .stdout(predicate::str::contains("plugin-b"));

    jprm_cmd()
        .args(["repo", "list"])
        .arg(temp.child("repo").path())
        .arg("plugin-a")
        .assert()
        .success()
        .stdout("1.1.0.0\n1.0.0.0\n");
}

#[test]
fn test_list_empty_repo_prints_nothing() {
    let temp = repo();
    jprm_cmd()
        .args(["repo", "list"])
        .arg(temp.child("repo").path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_list_unknown_plugin() {
    let temp = repo();
    jprm_cmd()
        .args(["repo", "list"])
        .arg(temp.child("repo").path())
        .arg("nope")
        .assert()
        .code(2);
}

#[test]
fn test_add_to_missing_repo() {
    let temp = assert_fs::TempDir::new().unwrap();
    let package = PackageFixture::new(plugin_meta(PLUGIN_A_GUID, "Plugin A", "1.0.0.0"))
        .write(&temp.child("a.zip").path().to_path_buf());

    jprm_cmd()
        .args(["repo", "add"])
        .arg(temp.path())
        .arg(package)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Try initializing the repo first"));
}

#[test]
fn test_add_plugin_url_count_mismatch() {
    let temp = repo();
    let package = PackageFixture::new(plugin_meta(PLUGIN_A_GUID, "Plugin A", "1.0.0.0"))
        .write(&temp.child("a.zip").path().to_path_buf());

    jprm_cmd()
        .args(["repo", "add"])
        .arg(temp.child("repo").path())
        .arg(&package)
        .arg(&package)
        .args(["-U", "https://cdn/a.zip"])
        .assert()
        .code(1);
}

#[test]
fn test_remove_version_then_plugin() {
    let temp = repo();
    add_package(&temp, PLUGIN_A_GUID, "Plugin A", "1.0.0.0");

    jprm_cmd()
        .args(["repo", "remove"])
        .arg(temp.child("repo").path())
        .args(["plugin-a", "1.0"])
        .assert()
        .success()
        .stdout(format!("removed {PLUGIN_A_GUID} 1.0.0.0\n"));

    jprm_cmd()
        .args(["repo", "remove"])
        .arg(temp.child("repo").path())
        .arg("Plugin A")
        .assert()
        .success()
        .stdout(format!("removed {PLUGIN_A_GUID}\n"));

    temp.child("repo/manifest.json")
        .assert(predicate::str::starts_with("[]"));
}

#[test]
fn test_remove_unknown_plugin() {
    let temp = repo();
    jprm_cmd()
        .args(["repo", "remove"])
        .arg(temp.child("repo").path())
        .arg("plugin-z")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("plugin-z"));
}

// ============================================================================
// plugin package
// ============================================================================

#[test]
fn test_plugin_package_prints_archive_path() {
    let project = TestProject::new()
        .with_config("Plugin A", "1.0")
        .with_binary("dummy.dll", b"binary");

    jprm_cmd()
        .current_dir(project.root())
        .args(["plugin", "package", "--version", "5.0"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("plugin-a_5.0.0.0.zip\n"));

    project.assert_file_exists("artifacts/plugin-a_5.0.0.0.zip");
    project.assert_file_exists("artifacts/plugin-a_5.0.0.0.zip.meta.json");
    project.assert_file_exists("artifacts/plugin-a_5.0.0.0.zip.md5sum");
}

#[test]
fn test_plugin_package_without_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    jprm_cmd()
        .args(["plugin", "package"])
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No build config found"));
}
