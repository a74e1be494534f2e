use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_table-filter")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

const TABLES: &str = r#"
[statusValues."1"]
"0" = ["true", "false", "unknown"]

[categoryValues."1"]
"0" = ["correct ", "wrong ", "missing "]
"#;

#[test]
fn test_encode_prints_filter_string() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("tables.toml");
    let input = dir.path().join("filters.json");
    write_file(&config, TABLES);
    write_file(
        &input,
        r#"[{"id": "1_status_0", "value": "true"}, {"id": "1_cputime_1", "value": ":5"}]"#,
    );

    let output = Command::new(bin())
        .args([
            "-c",
            config.to_str().expect("utf8 path"),
            "encode",
            input.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "1(0*status*(status(in(true)),category(empty())),1*cputime*(value(%3A5)))"
    );
}

#[test]
fn test_decode_json_output() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("tables.toml");
    let out = dir.path().join("out.json");
    write_file(&config, TABLES);

    let output = Command::new(bin())
        .args([
            "-c",
            config.to_str().expect("utf8 path"),
            "-F",
            "json",
            "-o",
            out.to_str().expect("utf8 path"),
            "decode",
            "1(0*status*(status(notIn(true))))",
        ])
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = fs::read_to_string(&out).expect("output file should exist");
    let decoded: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    let values: Vec<&str> = decoded
        .as_array()
        .expect("array of descriptors")
        .iter()
        .filter_map(|d| d["value"].as_str())
        .collect();
    assert_eq!(
        values,
        vec!["false", "unknown", "correct ", "wrong ", "missing "]
    );
}

#[test]
fn test_decode_from_url_tolerates_broken_filter() {
    let output = Command::new(bin())
        .args(["decode", "--url", "http://host/t.html#/?filter=1(0*x*(bogus(1)))"])
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("No filters."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ignoring malformed stored filter"));
}

#[test]
fn test_decode_rejects_malformed_string() {
    let output = Command::new(bin())
        .args(["decode", "1(0*status*(status(in(true))"])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed filter string"));
}

#[test]
fn test_check_reports_round_trip() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("tables.toml");
    let input = dir.path().join("filters.json5");
    write_file(&config, TABLES);
    write_file(
        &input,
        r#"[
  {id: "1_status_0", value: "false"},
  {id: "1_status_0", value: "wrong "},
  {id: "id", value: "loop", isTableTabFilter: true},
]"#,
    );

    let output = Command::new(bin())
        .args([
            "-c",
            config.to_str().expect("utf8 path"),
            "--color",
            "never",
            "check",
            input.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Round trip OK: id_any(value(loop)),1(0*status*(status(in(false)),category(in(wrong))))"
    );
}

#[test]
fn test_check_flags_dropped_task_id_value() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("tables.toml");
    let input = dir.path().join("filters.json");
    write_file(&config, TABLES);
    write_file(&input, r#"[{"id": "id", "value": "loop"}]"#);

    let output = Command::new(bin())
        .args([
            "-c",
            config.to_str().expect("utf8 path"),
            "--color",
            "never",
            "check",
            input.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("-id any: loop"));
}
