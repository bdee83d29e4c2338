//! Integration tests for the `citekit scan` command.

mod common;

use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

use common::{citekit_cmd, write_file};

#[test]
fn test_scan_lists_occurrences() {
    let temp = TempDir::new().expect("create temp dir");
    let answer = write_file(temp.path(), "answer.txt", "Paris is big[2]. Lyon too[10]!");

    citekit_cmd(temp.path())
        .arg("scan")
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::contains("[info] Found 2 citation(s)"))
        .stdout(predicate::str::contains("[2] 12..15  Paris is big[2]."))
        .stdout(predicate::str::contains("[10]"));
}

#[test]
fn test_scan_reads_stdin_as_json() {
    let temp = TempDir::new().expect("create temp dir");

    let output = citekit_cmd(temp.path())
        .args(["scan", "--json"])
        .write_stdin("A. [1] B.")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["rawIndex"], 1);
    assert_eq!(entries[0]["startIndex"], 3);
    assert_eq!(entries[0]["snippet"], "[1] B.");
}

#[test]
fn test_scan_without_brackets() {
    let temp = TempDir::new().expect("create temp dir");

    citekit_cmd(temp.path())
        .args(["scan", "--quiet"])
        .write_stdin("No references here.")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_scan_missing_file_fails() {
    let temp = TempDir::new().expect("create temp dir");

    citekit_cmd(temp.path())
        .args(["scan", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[err] Invalid input"));
}
