use aos_fs::{ConfigStore, Error, NormalizedPath};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestConfig {
    name: String,
    directories: Vec<String>,
}

#[rstest]
#[case("layer.toml", "name = \"base\"\ndirectories = [\"standards\"]")]
#[case("layer.json", r#"{"name": "base", "directories": ["standards"]}"#)]
#[case("layer.yaml", "name: base\ndirectories:\n  - standards")]
#[case("layer.yml", "name: base\ndirectories:\n  - standards")]
fn test_load_by_extension(#[case] file_name: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join(file_name);
    fs::write(&file_path, content).unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(
        config,
        TestConfig {
            name: "base".into(),
            directories: vec!["standards".into()],
        }
    );
}

#[test]
fn test_save_then_load_toml() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("out.toml"));
    let value = TestConfig {
        name: "team".into(),
        directories: vec!["standards".into(), "instructions".into()],
    };

    let store = ConfigStore::new();
    store.save(&path, &value).unwrap();
    let loaded: TestConfig = store.load(&path).unwrap();

    assert_eq!(loaded, value);
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.toml");
    fs::write(&file_path, "name = [unterminated").unwrap();

    let result: aos_fs::Result<TestConfig> =
        ConfigStore::new().load(&NormalizedPath::new(&file_path));

    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn test_unknown_extension_is_unsupported() {
    let path = NormalizedPath::new("/tmp/config.ini");
    let result: aos_fs::Result<TestConfig> = ConfigStore::new().parse(&path, "x=1");

    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}
