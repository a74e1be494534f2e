use std::fs;
use std::path::Path;

use table_filter::config::{ConfigError, default_config, load_config, load_config_from_path};
use table_filter::filter::{FilterDescriptor, serialize};
use table_filter::url_state::HistoryMode;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

#[test]
fn test_default_config() {
    let config = load_config(None).expect("default config");
    assert_eq!(config.param_name, "filter");
    assert_eq!(config.history, HistoryMode::Push);
    assert!(config.domain.status.is_empty());
    assert_eq!(&config, default_config());
}

#[test]
fn test_load_toml_config() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("tables.toml");
    write_file(
        &path,
        r#"
param_name = "f"
history = "replace"

[statusValues."1"]
"0" = ["true", "false", "unknown"]

[categoryValues."1"]
"0" = ["correct ", "wrong "]
"#,
    );

    let config = load_config_from_path(&path).expect("toml config should load");
    assert_eq!(config.param_name, "f");
    assert_eq!(config.history, HistoryMode::Replace);
    assert_eq!(
        config.domain.category_values("1", "0"),
        Some(&["correct ".to_string(), "wrong ".to_string()][..])
    );

    let encoded = serialize(
        &[FilterDescriptor::with_value("1_status_0", "unknown")],
        &config.domain,
    )
    .unwrap();
    assert_eq!(encoded, "1(0*status*(status(in(unknown)),category(empty())))");
}

#[test]
fn test_load_json5_config_with_aliases() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("tables.json5");
    write_file(
        &path,
        r#"{
  // exported from the result table
  status: { "0": { "0": ["true", "false"] } },
  category: { "0": { "0": ["correct ", "wrong "] } },
}"#,
    );

    let config = load_config_from_path(&path).expect("json5 config should load");
    assert_eq!(config.param_name, "filter");
    assert!(config.domain.is_status_column("0", "0"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("missing.toml");
    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    write_file(&path, "statusValues = [");
    assert!(matches!(
        load_config_from_path(&path),
        Err(ConfigError::ParseToml { .. })
    ));
}
