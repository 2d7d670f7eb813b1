//! Plugin packages built by hand, without going through the packager.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use zip::write::SimpleFileOptions;

/// `meta.json` content for a plugin build.
pub fn plugin_meta(guid: &str, name: &str, version: &str) -> Value {
    json!({
        "guid": guid,
        "name": name,
        "description": "Long description",
        "overview": "Short description",
        "owner": "jellyfin",
        "category": "General",
        "version": version,
        "changelog": format!("release {version}"),
        "targetAbi": "10.6.0.0",
        "timestamp": "2020-01-01T00:00:00Z"
    })
}

/// Builder for a plugin zip with `meta.json` at its root.
pub struct PackageFixture {
    meta: Value,
    files: Vec<(String, Vec<u8>)>,
    embed_meta: bool,
}

impl PackageFixture {
    pub fn new(meta: Value) -> Self {
        Self {
            meta,
            files: vec![("dummy.dll".to_string(), b"binary".to_vec())],
            embed_meta: true,
        }
    }

    /// Add a file at the archive root.
    pub fn with_file(mut self, name: &str, content: &[u8]) -> Self {
        self.files.push((name.to_string(), content.to_vec()));
        self
    }

    /// Add an image and reference it from the metadata.
    pub fn with_image(mut self, name: &str, content: &[u8]) -> Self {
        self.meta["image"] = json!(name);
        self.with_file(name, content)
    }

    /// Leave `meta.json` out of the archive.
    pub fn without_meta(mut self) -> Self {
        self.embed_meta = false;
        self
    }

    pub fn meta(&self) -> &Value {
        &self.meta
    }

    /// Write the archive to `path`.
    pub fn write(&self, path: &Path) -> PathBuf {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        if self.embed_meta {
            zip.start_file("meta.json", options).unwrap();
            zip.write_all(serde_json::to_string_pretty(&self.meta).unwrap().as_bytes())
                .unwrap();
        }
        for (name, content) in &self.files {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();

        path.to_path_buf()
    }

    /// Write the archive as `{dir}/{slug}_{version}.zip`.
    pub fn write_to_dir(&self, dir: &Path, slug: &str) -> PathBuf {
        let version = self.meta["version"].as_str().unwrap_or("0.0.0.0");
        self.write(&dir.join(format!("{slug}_{version}.zip")))
    }
}
