//! E2E tests for query planning, scoring and result aggregation.
//!
//! Each test builds indexes from an in-memory graph through the public
//! service and checks what the query operations return.

use e2e_tests::{occurrences, result_ids, strings, TestHarness};
use fulltext_types::{EngineConfig, FieldDiscovery, FuzzyEncoding, IndexKind};
use pretty_assertions::assert_eq;

#[test]
fn test_indexed_value_is_found_with_positive_score() {
    let mut harness = TestHarness::new();
    let alice = harness.add(&["Person"], &[("name", "Alice Smith"), ("city", "Paris")]);
    harness.add(&["Person"], &[("name", "Bob Jones"), ("city", "Rome")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Person")
        .unwrap();

    let results = harness
        .service
        .query_by_property(&harness.graph, "Person", &strings(&["name"]), "alice", None)
        .unwrap();

    assert_eq!(result_ids(&results), vec![alice]);
    assert!(results[0].score > 0.0);
    assert_eq!(
        results[0].document.get("name").and_then(|v| v.as_str()),
        Some("Alice Smith")
    );
    // Only the requested fields are snapshotted into the result
    assert!(results[0].document.get("city").is_none());
}

#[test]
fn test_exact_requires_adjacent_terms_in_order() {
    let mut harness = TestHarness::new();
    let in_order = harness.add(&["City"], &[("name", "New York")]);
    let reversed = harness.add(&["City"], &[("name", "York New")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "City")
        .unwrap();
    let fields = strings(&["name"]);

    let fuzzy = harness
        .service
        .query_by_property(&harness.graph, "City", &fields, "new york", None)
        .unwrap();
    let mut fuzzy_ids = result_ids(&fuzzy);
    fuzzy_ids.sort();
    assert_eq!(fuzzy_ids, vec![in_order, reversed]);

    let exact = harness
        .service
        .query_by_property(&harness.graph, "City", &fields, "\"New York\"", None)
        .unwrap();
    assert_eq!(result_ids(&exact), vec![in_order]);
    assert_eq!(exact[0].score, 1.0 / 8.0);
}

#[test]
fn test_fuzzy_requires_every_term() {
    let mut harness = TestHarness::new();
    let both = harness.add(&["Note"], &[("text", "quick brown fox")]);
    harness.add(&["Note"], &[("text", "quick red panda")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Note")
        .unwrap();

    let results = harness
        .service
        .query_by_property(&harness.graph, "Note", &strings(&["text"]), "FOX quick", None)
        .unwrap();
    assert_eq!(result_ids(&results), vec![both]);
}

#[test]
fn test_exact_score_prefers_shortest_containing_value() {
    let mut harness = TestHarness::new();
    let short = harness.add(&["Band"], &[("title", "New York Dolls")]);
    let long = harness.add(
        &["Band"],
        &[("title", "The New York Philharmonic Orchestra")],
    );
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Band")
        .unwrap();

    let results = harness
        .service
        .query_by_label(&harness.graph, &strings(&["Band"]), "\"New York\"", None, None)
        .unwrap();

    assert_eq!(result_ids(&results), vec![short, long]);
    assert_eq!(results[0].score, 1.0 / 14.0);
    assert_eq!(results[1].score, 1.0 / 35.0);
}

#[test]
fn test_exact_score_falls_back_to_case_insensitive() {
    let mut harness = TestHarness::new();
    let id = harness.add(&["City"], &[("name", "NEW YORK")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "City")
        .unwrap();

    let results = harness
        .service
        .query_by_label(&harness.graph, &strings(&["City"]), "\"new york\"", None, None)
        .unwrap();
    assert_eq!(result_ids(&results), vec![id]);
    assert_eq!(results[0].score, 1.0 / 8.0);
}

#[test]
fn test_reindex_does_not_duplicate_results() {
    let mut harness = TestHarness::new();
    let id = harness.add(&["Person"], &[("name", "Alice"), ("bio", "likes alice springs")]);
    let keys: Vec<String> = Vec::new();

    harness.service.index(&harness.graph, id, &keys).unwrap();
    let index = harness
        .service
        .store()
        .open(IndexKind::Node, "Person")
        .unwrap()
        .unwrap();
    let before = index.num_postings().unwrap();

    harness.service.index(&harness.graph, id, &keys).unwrap();
    harness.service.index(&harness.graph, id, &keys).unwrap();
    assert_eq!(index.num_postings().unwrap(), before);

    // Both fields match; the node still appears once
    let results = harness
        .service
        .query_by_label(&harness.graph, &strings(&["Person"]), "alice", None, None)
        .unwrap();
    assert_eq!(occurrences(&results, id), 1);
}

#[test]
fn test_reindex_drops_stale_values() {
    let mut harness = TestHarness::new();
    let id = harness.add(&["Person"], &[("name", "Alice")]);
    let keys: Vec<String> = Vec::new();
    harness.service.index(&harness.graph, id, &keys).unwrap();

    harness.graph.set_property(id, "name", "Bob").unwrap();
    harness.service.index(&harness.graph, id, &keys).unwrap();

    let fields = strings(&["name"]);
    let stale = harness
        .service
        .query_by_property(&harness.graph, "Person", &fields, "alice", None)
        .unwrap();
    assert!(stale.is_empty());

    let fresh = harness
        .service
        .query_by_property(&harness.graph, "Person", &fields, "bob", None)
        .unwrap();
    assert_eq!(result_ids(&fresh), vec![id]);
}

#[test]
fn test_multi_label_limit_keeps_best() {
    let mut harness = TestHarness::new();
    let city = harness.add(&["City"], &[("name", "New York")]);
    harness.add(&["Band"], &[("title", "New York Dolls")]);
    harness
        .service
        .add_nodes_index_by_labels(&harness.graph, &strings(&["City", "Band"]))
        .unwrap();

    let results = harness
        .service
        .query_by_label(
            &harness.graph,
            &strings(&["City", "Band"]),
            "\"New York\"",
            Some(0.0),
            Some(1),
        )
        .unwrap();

    assert_eq!(result_ids(&results), vec![city]);
    assert_eq!(results[0].score, 1.0 / 8.0);
}

#[test]
fn test_missing_index_yields_empty() {
    let mut harness = TestHarness::new();
    harness.add(&["Person"], &[("name", "Alice")]);

    let by_property = harness
        .service
        .query_by_property(&harness.graph, "Nope", &strings(&["name"]), "alice", None)
        .unwrap();
    assert!(by_property.is_empty());

    let by_label = harness
        .service
        .query_by_label(&harness.graph, &strings(&["Person", "../etc"]), "alice", None, None)
        .unwrap();
    assert!(by_label.is_empty());

    let by_value = harness
        .service
        .query_by_value(&harness.graph, "alice", None, None)
        .unwrap();
    assert!(by_value.is_empty());

    assert!(harness.service.search("Person", "alice").unwrap().is_empty());
}

#[test]
fn test_min_score_is_strict() {
    let mut harness = TestHarness::new();
    let id = harness.add(&["City"], &[("name", "New York")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "City")
        .unwrap();
    let labels = strings(&["City"]);

    let at_threshold = harness
        .service
        .query_by_label(&harness.graph, &labels, "\"New York\"", Some(1.0 / 8.0), None)
        .unwrap();
    assert!(at_threshold.is_empty());

    let below_threshold = harness
        .service
        .query_by_label(&harness.graph, &labels, "\"New York\"", Some(0.1), None)
        .unwrap();
    assert_eq!(result_ids(&below_threshold), vec![id]);
}

#[test]
fn test_results_sorted_by_descending_score() {
    let mut harness = TestHarness::new();
    harness.add(&["City"], &[("name", "York")]);
    harness.add(&["City"], &[("name", "New York")]);
    harness.add(&["Band"], &[("title", "New York Dolls")]);
    harness.service.add_nodes_index(&harness.graph).unwrap();

    let results = harness
        .service
        .query_by_value(&harness.graph, "\"York\"", None, None)
        .unwrap();

    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![1.0 / 4.0, 1.0 / 8.0, 1.0 / 14.0]);
}

#[test]
fn test_deleted_node_hits_are_skipped() {
    let mut harness = TestHarness::new();
    let gone = harness.add(&["Person"], &[("name", "Alice Smith")]);
    let kept = harness.add(&["Person"], &[("name", "Alice Jones")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Person")
        .unwrap();

    harness.graph.remove_node(gone);

    let results = harness
        .service
        .query_by_property(&harness.graph, "Person", &strings(&["name"]), "alice", None)
        .unwrap();
    assert_eq!(result_ids(&results), vec![kept]);
}

#[test]
fn test_union_discovery_searches_every_key() {
    let config = EngineConfig::default().with_field_discovery(FieldDiscovery::Union);
    let mut harness = TestHarness::with_config(config);
    harness.add(&["Person"], &[("name", "Alice")]);
    let with_motto = harness.add(&["Person"], &[("name", "Bob"), ("motto", "carpe diem")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Person")
        .unwrap();

    let results = harness
        .service
        .query_by_label(&harness.graph, &strings(&["Person"]), "diem", None, None)
        .unwrap();
    assert_eq!(result_ids(&results), vec![with_motto]);
}

#[test]
fn test_first_document_discovery_ignores_later_keys() {
    let mut harness = TestHarness::new();
    harness.add(&["Person"], &[("name", "Alice")]);
    harness.add(&["Person"], &[("name", "Bob"), ("motto", "carpe diem")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Person")
        .unwrap();

    let results = harness
        .service
        .query_by_label(&harness.graph, &strings(&["Person"]), "diem", None, None)
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_offset_encoding_matches_nothing_in_fuzzy_mode() {
    let config = EngineConfig::default().with_fuzzy_encoding(FuzzyEncoding::Offsets);
    let mut harness = TestHarness::with_config(config);
    let id = harness.add(&["City"], &[("name", "New York")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "City")
        .unwrap();
    let labels = strings(&["City"]);

    let fuzzy = harness
        .service
        .query_by_label(&harness.graph, &labels, "york", None, None)
        .unwrap();
    assert!(fuzzy.is_empty());

    // Exact mode is unaffected by the encoding
    let exact = harness
        .service
        .query_by_label(&harness.graph, &labels, "\"York\"", None, None)
        .unwrap();
    assert_eq!(result_ids(&exact), vec![id]);
}

#[test]
fn test_key_restricts_match_to_its_field() {
    let mut harness = TestHarness::new();
    let named = harness.add(&["Person"], &[("name", "Paris Hilton"), ("city", "London")]);
    harness.add(&["Person"], &[("name", "Jean Valjean"), ("city", "Paris")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Person")
        .unwrap();

    let results = harness
        .service
        .query_by_property(&harness.graph, "Person", &strings(&["name"]), "paris", None)
        .unwrap();
    assert_eq!(result_ids(&results), vec![named]);
}

#[test]
fn test_search_returns_ids() {
    let mut harness = TestHarness::new();
    let alice = harness.add(&["Person"], &[("name", "Alice")]);
    let bob = harness.add(&["Person"], &[("name", "Bob")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "Person")
        .unwrap();

    assert_eq!(harness.service.search("Person", "alice").unwrap(), vec![alice]);
    assert_eq!(
        harness
            .service
            .search("Person", "key:name AND bob")
            .unwrap(),
        vec![bob]
    );
}

#[test]
fn test_exact_skips_token_match_without_literal() {
    let mut harness = TestHarness::new();
    harness.add(&["City"], &[("name", "New-York")]);
    let spaced = harness.add(&["City"], &[("name", "New York")]);
    harness
        .service
        .add_nodes_index_by_label(&harness.graph, "City")
        .unwrap();

    let results = harness
        .service
        .query_by_property(&harness.graph, "City", &strings(&["name"]), "\"New York\"", None)
        .unwrap();
    assert_eq!(result_ids(&results), vec![spaced]);
    assert_eq!(results[0].score, 1.0 / 8.0);
}
