//! E2E tests driving the CLI command layer against a RocksDB graph.

use std::fs;

use clap::Parser;
use e2e_tests::TestHarness;
use fulltext_cli::{execute, Cli};
use pretty_assertions::assert_eq;
use serde_json::Value;

const SNAPSHOT: &str = r#"{
    "nodes": [
        { "id": 1, "labels": ["Person"], "properties": { "name": "Alice Smith", "age": 41 } },
        { "id": 2, "labels": ["Person"], "properties": { "name": "Alice" } },
        { "id": 3, "labels": ["Book"], "properties": { "title": "Alice in Wonderland" } }
    ]
}"#;

fn run(harness: &TestHarness, args: &[&str]) -> Vec<Value> {
    let cli = Cli::parse_from(std::iter::once("fulltext").chain(args.iter().copied()));
    let mut out = Vec::new();
    execute(cli.command, &harness.settings(), &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn ids(lines: &[Value]) -> Vec<u64> {
    lines
        .iter()
        .map(|line| line["document"]["id"].as_u64().unwrap())
        .collect()
}

fn seeded() -> TestHarness {
    let harness = TestHarness::new();
    let snapshot = harness._temp_dir.path().join("snapshot.json");
    fs::write(&snapshot, SNAPSHOT).unwrap();
    let lines = run(&harness, &["import", snapshot.to_str().unwrap()]);
    assert_eq!(lines[0]["imported"], 3);
    harness
}

#[test]
fn test_cli_exact_query_across_labels() {
    let harness = seeded();
    run(&harness, &["index-labels", "Person", "Book"]);

    let lines = run(
        &harness,
        &["query-label", "\"Alice\"", "-L", "Person", "-L", "Book", "-n", "2"],
    );
    assert_eq!(ids(&lines), vec![2, 1]);
    assert_eq!(lines[0]["score"], 1.0 / 5.0);
}

#[test]
fn test_cli_numeric_values_are_indexed_as_text() {
    let harness = seeded();
    run(&harness, &["index-all"]);

    let lines = run(&harness, &["query-property", "Person", "41", "-f", "age"]);
    assert_eq!(ids(&lines), vec![1]);
}

#[test]
fn test_cli_index_single_node_then_list() {
    let harness = seeded();
    let stats = run(&harness, &["index", "3", "--keys", "title"]);
    assert_eq!(stats[0]["documents"], 1);
    assert_eq!(stats[0]["postings"], 1);

    let names = run(&harness, &["list"]);
    assert_eq!(names, vec![Value::from("Book")]);

    let hits = run(&harness, &["search", "Book", "wonderland"]);
    assert_eq!(hits, vec![serde_json::json!({ "id": 3 })]);
}
