//! [`TestProject`] builder for plugin source trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary plugin project directory.
///
/// # Example
///
/// ```rust,no_run
/// use jprm_test_utils::TestProject;
///
/// let project = TestProject::new()
///     .with_config("Plugin A", "1.0")
///     .with_binary("dummy.dll", b"binary")
///     .with_image("image.png", b"png");
/// project.assert_file_exists("jprm.yaml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Default binary directory, `bin/` under the root.
    pub fn bin_dir(&self) -> PathBuf {
        self.root().join("bin")
    }

    /// Write `jprm.yaml` for a complete plugin with a single `dummy.dll` artifact.
    pub fn with_config(self, name: &str, version: &str) -> Self {
        let config = format!(
            "name: \"{name}\"\n\
             guid: \"{guid}\"\n\
             version: \"{version}\"\n\
             targetAbi: \"10.6.0.0\"\n\
             framework: \"net5.0\"\n\
             owner: \"jellyfin\"\n\
             overview: \"Short description\"\n\
             description: \"Long description\"\n\
             category: \"General\"\n\
             artifacts:\n  - \"dummy.dll\"\n\
             changelog: \"changelog\"\n",
            guid = crate::PLUGIN_A_GUID,
        );
        self.with_file("jprm.yaml", config.as_bytes())
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
        self
    }

    /// Write a build output into `bin/`.
    pub fn with_binary(self, name: &str, content: &[u8]) -> Self {
        self.with_file(&format!("bin/{name}"), content)
    }

    pub fn with_image(self, name: &str, content: &[u8]) -> Self {
        self.with_file(name, content)
    }

    pub fn read_to_string(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
