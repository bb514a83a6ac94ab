//! Tests for the `treestat` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn treestat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treestat"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run treestat")
}

/// Helper to write `html` to a file unique to the calling test.
fn fixture(name: &str, html: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("treestat-{}-{name}.html", std::process::id()));
    fs::write(&path, html).expect("write fixture");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_no_arguments_prints_usage() {
    let output = treestat(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage: treestat <html filename>"));
}

#[test]
fn test_too_many_arguments_prints_usage() {
    let output = treestat(&["a.html", "b.html"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn test_missing_file() {
    let output = treestat(&["/definitely/not/here.html"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("File /definitely/not/here.html not found!"));
}

#[test]
fn test_prints_element_count() {
    let path = fixture("count", "<html><body>Hi</body></html>");
    let output = treestat(&[path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Elements = 2\n");
    let _ = fs::remove_file(path);
}

#[test]
fn test_report() {
    let path = fixture("report", "<p class=a>x</p>");
    let output = treestat(&["--report", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));

    let report = stdout(&output);
    assert!(report.contains("elements = 3"));
    assert!(report.contains("parser_inserted = 2"));
    assert!(report.contains("Max attribute = 1."));
    let _ = fs::remove_file(path);
}

#[test]
fn test_json() {
    let path = fixture("json", "<!DOCTYPE html><div><br></div>");
    let output = treestat(&["--json", "--strict", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["elements"], 4);
    assert_eq!(value["parse_errors"], 0);
    assert!(value["allocations"].as_u64().unwrap() > 0);
}

#[test]
fn test_report_text_length_is_file_size() {
    let path = std::env::temp_dir().join(format!("treestat-{}-latin1.html", std::process::id()));
    fs::write(&path, b"<p>caf\xe9</p>").expect("write fixture");
    let output = treestat(&["--report", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Text length = 11\n"));
    let _ = fs::remove_file(path);
}

#[test]
fn test_corpus() {
    let first = fixture("corpus-a", "<html><body>Hi</body></html>");
    let second = fixture("corpus-b", "<p class=a>x</p>");
    let output = treestat(&[
        "--corpus",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let summary = stdout(&output);
    assert!(summary.starts_with("Documents = 2\n"));
    assert!(summary.contains("\nnodes: mean=4.50, median=4.50, 95th%=4.95, max=5.00\n"));
    assert!(summary.contains("\nattribute: total=5, bins=2\n4 1\n"));
    let _ = fs::remove_file(first);
    let _ = fs::remove_file(second);
}

#[test]
fn test_corpus_conflicts_with_report() {
    let output = treestat(&["--corpus", "--report", "x.html"]);
    assert!(!output.status.success());
}

#[test]
fn test_report_and_json_conflict() {
    let output = treestat(&["--report", "--json", "x.html"]);
    assert!(!output.status.success());
}

#[test]
fn test_version() {
    let output = treestat(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("treestat "));
}
