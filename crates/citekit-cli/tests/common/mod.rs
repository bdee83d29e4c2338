//! Shared test utilities for citekit-cli integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Get a Command for the citekit binary, isolated from the caller's
/// environment and home configuration.
#[allow(deprecated)]
pub fn citekit_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("citekit").expect("citekit binary should exist");
    cmd.env("HOME", home)
        .env("CITEKIT_COLOR", "never")
        .env_remove("CITEKIT_CONFIG")
        .env_remove("CITEKIT_STRATEGY")
        .env_remove("CITEKIT_VERBOSE")
        .env_remove("CITEKIT_QUIET")
        .env_remove("RUST_LOG");
    cmd
}

/// Two chunks, one entity, one web hit and one context document, so the
/// category-ordered aggregator indices are 1..=5.
pub const MIXED_RESULTS: &str = r#"{
  "chunk_search_results": [
    {
      "id": "00000000-0000-0000-0000-000000000001",
      "document_id": "00000000-0000-0000-0000-0000000003e9",
      "text": "Paris is the capital."
    },
    {
      "id": "00000000-0000-0000-0000-000000000002",
      "document_id": "00000000-0000-0000-0000-0000000003ea",
      "text": "France is in Europe."
    }
  ],
  "graph_search_results": [
    {
      "content": { "id": 7, "name": "Paris", "description": "Capital city of France" },
      "result_type": "entity"
    }
  ],
  "web_search_results": [
    {
      "title": "Paris - Wikipedia",
      "link": "https://en.wikipedia.org/wiki/Paris",
      "snippet": "About Paris",
      "position": 1
    }
  ],
  "context_document_results": [
    {
      "document": { "id": "doc-1", "title": "Travel notes", "summary": "Notes from a trip" },
      "chunks": ["Day one", "Day two"]
    }
  ]
}"#;

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write test file");
    path
}

/// A ledger recorded during retrieval: the web hit first, then the first chunk.
/// The graph item and context document of [`MIXED_RESULTS`] are absent.
pub const WEB_FIRST_LEDGER: &str = r#"[
  {
    "aggregatorIndex": 1,
    "sourceType": "web",
    "item": {
      "title": "Paris - Wikipedia",
      "link": "https://en.wikipedia.org/wiki/Paris",
      "snippet": "About Paris",
      "position": 1
    }
  },
  {
    "aggregatorIndex": 2,
    "sourceType": "chunk",
    "item": {
      "id": "00000000-0000-0000-0000-000000000001",
      "document_id": "00000000-0000-0000-0000-0000000003e9",
      "text": "Paris is the capital."
    }
  }
]"#;
