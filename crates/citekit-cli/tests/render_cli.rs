//! Integration tests for `citekit render prompt` and `citekit render stream`.

mod common;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{citekit_cmd, write_file, MIXED_RESULTS, WEB_FIRST_LEDGER};

#[test]
fn test_render_prompt_layout() {
    let temp = TempDir::new().expect("create temp dir");
    let results = write_file(temp.path(), "results.json", MIXED_RESULTS);

    citekit_cmd(temp.path())
        .args(["render", "prompt", "--results"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Vector Search Results:\nSource [1]:\nParis is the capital.\nSource [2]:\n",
        ))
        .stdout(predicate::str::contains(
            "Graph Search Results:\nSource [3]:\nEntity Name: Paris\nDescription: Capital city of France",
        ))
        .stdout(predicate::str::contains(
            "Web Search Results:\nSource [4]:\nTitle: Paris - Wikipedia",
        ))
        .stdout(predicate::str::contains(
            "Source [5]:\nDocument Title: Travel notes (ID: doc-1)\nSummary: Notes from a trip\nChunk 1: Day one\nChunk 2: Day two",
        ));
}

#[test]
fn test_render_stream_segments() {
    let temp = TempDir::new().expect("create temp dir");
    let results = write_file(temp.path(), "results.json", MIXED_RESULTS);

    citekit_cmd(temp.path())
        .args(["render", "stream", "--results"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<chunk_search>["))
        .stdout(predicate::str::contains("</chunk_search><graph_search>["))
        .stdout(predicate::str::contains("</graph_search><web_search>["))
        .stdout(predicate::str::contains("</web_search><content>["))
        .stdout(predicate::str::contains("\"chunks\":[\"Day one\",\"Day two\"]"));
}

#[test]
fn test_render_stream_skips_empty_categories() {
    let temp = TempDir::new().expect("create temp dir");
    let results = write_file(
        temp.path(),
        "results.json",
        r#"{"web_search_results": [{"title": "T", "link": "https://t.example"}]}"#,
    );

    citekit_cmd(temp.path())
        .args(["render", "stream", "-r"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<web_search>["))
        .stdout(predicate::str::contains("chunk_search").not())
        .stdout(predicate::str::contains("<content>").not());
}

#[test]
fn test_render_prompt_with_ledger_and_marker() {
    let temp = TempDir::new().expect("create temp dir");
    let results = write_file(temp.path(), "results.json", MIXED_RESULTS);
    let ledger = write_file(temp.path(), "ledger.json", WEB_FIRST_LEDGER);
    let config = write_file(
        temp.path(),
        "config.yaml",
        "citations:\n  missingIndexMarker: \"n/a\"\n",
    );

    citekit_cmd(temp.path())
        .args(["render", "prompt", "--results"])
        .arg(&results)
        .arg("--ledger")
        .arg(&ledger)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Vector Search Results:\nSource [2]:\nParis is the capital.\nSource [n/a]:\n",
        ))
        .stdout(predicate::str::contains("Graph Search Results:\nSource [n/a]:"))
        .stdout(predicate::str::contains("Web Search Results:\nSource [1]:"));
}
