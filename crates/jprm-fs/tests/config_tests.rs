use jprm_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Entry {
    name: String,
    versions: Vec<String>,
}

#[test]
fn test_save_and_load_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manifest.json");
    let store = ConfigStore::new();
    let entries = vec![Entry {
        name: "Plugin A".into(),
        versions: vec!["1.0.0.0".into()],
    }];

    store.save(&path, &entries).unwrap();
    let loaded: Vec<Entry> = store.load(&path).unwrap();

    assert_eq!(loaded, entries);
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("[\n    {\n        \"name\": \"Plugin A\""));
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jprm.yaml");
    fs::write(&path, "name: Plugin A\nversions:\n  - \"1.0\"\n").unwrap();

    let loaded: Entry = ConfigStore::new().load(&path).unwrap();

    assert_eq!(loaded.name, "Plugin A");
    assert_eq!(loaded.versions, vec!["1.0"]);
}

#[test]
fn test_load_invalid_yaml_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jprm.yaml");
    fs::write(&path, "]]]").unwrap();

    let result: jprm_fs::Result<Entry> = ConfigStore::new().load(&path);

    assert!(matches!(result, Err(jprm_fs::Error::ConfigParse { .. })));
}
