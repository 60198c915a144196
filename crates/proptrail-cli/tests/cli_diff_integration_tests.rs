//! CLI diff integration tests
//!
//! Spawn the `proptrail` binary on snapshot files in a scratch directory and
//! check the JSON lines it emits.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BEFORE: &str = r#"{
  "id": "doc-1",
  "lifecycle_state": "project",
  "schemas": [
    { "name": "dublincore", "properties": [
      { "name": "dc:title", "type": "scalar", "value": "Report" },
      { "name": "dc:subjects", "type": "scalar_list", "value": ["science"] },
      { "name": "dc:modified", "type": "scalar", "value": { "date": "2016-03-16T10:00:00+00:00" } }
    ]},
    { "name": "test", "properties": [
      { "name": "test:complex", "type": "record", "children": [
        { "name": "string", "type": "scalar" }
      ]}
    ]},
    { "name": "file", "properties": [
      { "name": "content", "type": "attachment" }
    ]}
  ]
}"#;

const AFTER: &str = r#"{
  "id": "doc-1",
  "lifecycle_state": "project",
  "schemas": [
    { "name": "dublincore", "properties": [
      { "name": "dc:title", "type": "scalar", "value": "Final" },
      { "name": "dc:subjects", "type": "scalar_list", "value": ["art"] },
      { "name": "dc:modified", "type": "scalar", "value": { "date": "2016-03-17T10:00:00+00:00" } }
    ]},
    { "name": "test", "properties": [
      { "name": "test:complex", "type": "record", "children": [
        { "name": "string", "type": "scalar", "value": "hello" }
      ]}
    ]},
    { "name": "file", "properties": [
      { "name": "content", "type": "attachment", "value": { "filename": "text.txt", "length": 11 } }
    ]}
  ]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_proptrail"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn parse_lines(raw: &str) -> Vec<serde_json::Value> {
    raw.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_cli_diff_writes_json_lines_to_stdout() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", AFTER);

    let output = run(&[
        "diff",
        "--before",
        path_arg(&before),
        "--after",
        path_arg(&after),
        "--actor",
        "alice",
    ]);

    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let entries = parse_lines(&String::from_utf8_lossy(&output.stdout));
    let comments: Vec<&str> = entries
        .iter()
        .map(|e| e["comment"].as_str().unwrap())
        .collect();
    assert_eq!(
        comments,
        vec![
            "dc:title : Report -> Final",
            "dc:subjects : Added art",
            "dc:subjects : Removed science",
            "test:complex/string : EMPTY -> hello",
            "content : EMPTY -> text.txt",
        ]
    );
    assert!(entries.iter().all(|e| e["actor_name"] == "alice"));
    assert!(entries.iter().all(|e| e["origin_id"] == "default"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("5 change(s) recorded for doc-1"));
}

#[test]
fn test_cli_diff_appends_to_output_file() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", AFTER);
    let log = dir.path().join("audit.jsonl");

    for _ in 0..2 {
        let output = run(&[
            "diff",
            "--before",
            path_arg(&before),
            "--after",
            path_arg(&after),
            "--output",
            path_arg(&log),
        ]);
        assert!(output.status.success());
        assert!(output.stdout.is_empty());
    }

    let entries = parse_lines(&fs::read_to_string(&log).unwrap());
    assert_eq!(entries.len(), 10);
}

#[test]
fn test_cli_diff_identical_snapshots_emit_nothing() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", BEFORE);

    let output = run(&[
        "diff",
        "--before",
        path_arg(&before),
        "--after",
        path_arg(&after),
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No changes for doc-1"));
}

#[test]
fn test_cli_diff_honours_config_file() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", AFTER);
    let config = write(
        &dir,
        "audit.toml",
        "excluded_fields = [\"dc:title\", \"dc:subjects\", \"content\"]\nempty_value = \"-\"\n",
    );

    let output = run(&[
        "diff",
        "--before",
        path_arg(&before),
        "--after",
        path_arg(&after),
        "--config",
        path_arg(&config),
    ]);

    assert!(output.status.success());
    let entries = parse_lines(&String::from_utf8_lossy(&output.stdout));
    let paths: Vec<&str> = entries
        .iter()
        .map(|e| e["field_path"].as_str().unwrap())
        .collect();
    // the replaced exclusion set no longer covers dc:modified
    assert_eq!(paths, vec!["dc:modified", "test:complex/string"]);
    assert_eq!(entries[1]["old_value"], "-");
}

#[test]
fn test_cli_diff_rejects_mismatched_documents() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", &AFTER.replacen("doc-1", "doc-2", 1));

    let output = run(&[
        "diff",
        "--before",
        path_arg(&before),
        "--after",
        path_arg(&after),
    ]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("different documents"));
}

#[test]
fn test_cli_diff_reports_invalid_config() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", AFTER);
    let config = write(&dir, "audit.toml", "date_pattern = \"%Q\"\n");

    let output = run(&[
        "diff",
        "--before",
        path_arg(&before),
        "--after",
        path_arg(&after),
        "--config",
        path_arg(&config),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}

#[test]
fn test_cli_diff_logs_trace_id_in_json_logs() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", BEFORE);
    let after = write(&dir, "after.json", AFTER);

    let output = Command::new(env!("CARGO_BIN_EXE_proptrail"))
        .args([
            "diff",
            "--before",
            path_arg(&before),
            "--after",
            path_arg(&after),
            "--trace-id",
            "trace-cli-1",
            "--json-logs",
        ])
        .env("RUST_LOG", "proptrail=info")
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|v| v["fields"]["event"] == "start")
        .expect("start event in JSON logs");
    assert_eq!(start["fields"]["trace_id"], "trace-cli-1");
    assert_eq!(start["fields"]["subject_id"], "doc-1");
}
