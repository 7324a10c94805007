//! Query execution across indexes and result aggregation.
//!
//! Each target index is planned and searched on its own; hits are turned
//! into document snapshots and scored. Multi-index queries concatenate the
//! per-index results, stable-sort them by descending score, keep scores
//! strictly above the threshold and finally apply the limit.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use fulltext_storage::{GraphError, GraphStore};
use fulltext_types::{
    Document, EngineConfig, FieldDiscovery, IndexKind, QueryRequest, ScoredResult,
};

use crate::error::SearchError;
use crate::planner::QueryPlanner;
use crate::scorer::score_hit;
use crate::searcher::PostingSearcher;
use crate::store::IndexStore;

/// Sort by descending score, drop scores not above `min_score`, apply `limit`.
///
/// The sort is stable: equal scores keep their incoming order.
pub fn finalize(
    mut results: Vec<ScoredResult>,
    min_score: Option<f64>,
    limit: Option<usize>,
) -> Vec<ScoredResult> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(min) = min_score {
        results.retain(|r| r.score > min);
    }
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    results
}

/// Runs queries against the indexes of one store.
pub struct ResultAggregator<'a> {
    store: &'a IndexStore,
    config: &'a EngineConfig,
}

impl<'a> ResultAggregator<'a> {
    pub fn new(store: &'a IndexStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Query one index over `fields`.
    ///
    /// A missing index yields no results. Each result carries the
    /// requested fields of its document.
    pub fn query_by_property(
        &self,
        graph: &dyn GraphStore,
        index_name: &str,
        fields: &[String],
        raw_value: &str,
        min_score: Option<f64>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let results = self.query_index(graph, index_name, fields, raw_value)?;
        Ok(finalize(results, min_score, None))
    }

    /// Query the index of each label over that label's discovered fields.
    pub fn query_by_label(
        &self,
        graph: &dyn GraphStore,
        labels: &[String],
        raw_value: &str,
        min_score: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let request = QueryRequest::new(raw_value)
            .with_indexes(labels.iter().cloned())
            .with_min_score(min_score)
            .with_limit(limit);
        self.execute(graph, &request)
    }

    /// Query every existing node index, each over the fields of its label.
    pub fn query_by_value(
        &self,
        graph: &dyn GraphStore,
        raw_value: &str,
        min_score: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let names = self.store.list_names(IndexKind::Node)?;
        self.query_by_label(graph, &names, raw_value, min_score, limit)
    }

    /// Execute a request over all of its target indexes.
    ///
    /// With no property fields, each index searches the fields discovered
    /// for the label of the same name.
    pub fn execute(
        &self,
        graph: &dyn GraphStore,
        request: &QueryRequest,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let mut results = Vec::new();
        for index_name in &request.target_indexes {
            let fields = if request.property_fields.is_empty() {
                self.discover_fields(graph, index_name)?
            } else {
                request.property_fields.clone()
            };
            if fields.is_empty() {
                debug!(label = %index_name, "No fields to search for label");
                continue;
            }
            results.extend(self.query_index(graph, index_name, &fields, &request.raw_value)?);
        }

        let total = results.len();
        let results = finalize(results, request.min_score, request.limit);
        info!(
            indexes = request.target_indexes.len(),
            matched = total,
            returned = results.len(),
            "Query complete"
        );
        Ok(results)
    }

    /// Property keys to search for `label`.
    pub fn discover_fields(
        &self,
        graph: &dyn GraphStore,
        label: &str,
    ) -> Result<Vec<String>, SearchError> {
        let mut documents = graph.iterate_by_label(label)?;
        match self.config.field_discovery {
            FieldDiscovery::FirstDocument => match documents.next() {
                Some(document) => Ok(document?.keys().map(str::to_string).collect()),
                None => Ok(Vec::new()),
            },
            FieldDiscovery::Union => {
                let mut keys = BTreeSet::new();
                for document in documents {
                    keys.extend(document?.keys().map(str::to_string));
                }
                Ok(keys.into_iter().collect())
            }
        }
    }

    fn query_index(
        &self,
        graph: &dyn GraphStore,
        index_name: &str,
        fields: &[String],
        raw_value: &str,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let Some(index) = self.store.find(IndexKind::Node, index_name)? else {
            debug!(index = index_name, "Skipping query, index does not exist");
            return Ok(Vec::new());
        };

        let planner = QueryPlanner::new(self.store.analyzers(), self.config.fuzzy_encoding);
        let plan = planner.plan(raw_value, fields, &index.descriptor().analyzer);
        debug!(index = index_name, query = %plan.render(), "Planned query");

        let hits = PostingSearcher::new(&index)?.search_plan(&plan)?;
        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let properties = match graph.get_properties(hit.node, None) {
                Ok(properties) => properties,
                Err(GraphError::DocumentNotFound(id)) => {
                    warn!(index = index_name, node_id = %id, "Index hit for missing node");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let Some(score) = score_hit(&plan, hit.node, hit.score, &properties) else {
                continue;
            };
            let snapshot = fields
                .iter()
                .filter_map(|f| properties.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            results.push(ScoredResult::new(
                Document::with_properties(hit.node, snapshot),
                score,
            ));
        }
        Ok(results)
    }

    /// Run a raw query string against one index, top `limit` nodes.
    ///
    /// Results carry every property of their document.
    pub fn search_ranked(
        &self,
        graph: &dyn GraphStore,
        index_name: &str,
        query_str: &str,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let Some(index) = self.store.find(IndexKind::Node, index_name)? else {
            debug!(index = index_name, "Skipping search, index does not exist");
            return Ok(Vec::new());
        };

        let hits = PostingSearcher::new(&index)?.search_raw(query_str, limit)?;
        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            match graph.get_document(hit.node, None) {
                Ok(document) => results.push(ScoredResult::new(document, hit.score)),
                Err(GraphError::DocumentNotFound(id)) => {
                    warn!(index = index_name, node_id = %id, "Index hit for missing node");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IndexBuilder;
    use fulltext_storage::MemoryGraph;
    use fulltext_types::{AnalyzerConfig, NodeId, PropertyMap, PropertyValue};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), PropertyValue::from(*v)))
            .collect()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn result(id: u64, score: f64) -> ScoredResult {
        ScoredResult::new(Document::new(NodeId(id)), score)
    }

    fn ids(results: &[ScoredResult]) -> Vec<u64> {
        results.iter().map(|r| r.document.id.0).collect()
    }

    fn setup() -> (IndexStore, MemoryGraph, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path()).with_memory_mb(15);

        let mut graph = MemoryGraph::new();
        graph.add_node(["City"], props(&[("name", "New York"), ("country", "USA")]));
        graph.add_node(
            ["City"],
            props(&[("name", "York"), ("motto", "New York is younger")]),
        );
        graph.add_node(["City"], props(&[("name", "Paris"), ("country", "France")]));
        graph.add_node(["Band"], props(&[("title", "New York Dolls")]));

        let builder = IndexBuilder::new(&store, AnalyzerConfig::standard());
        builder.index_all_by_label(&graph, "City", &[], None).unwrap();
        builder.index_all_by_label(&graph, "Band", &[], None).unwrap();

        (store, graph, temp_dir)
    }

    #[test]
    fn test_finalize_filters_strictly_and_limits() {
        let results = vec![result(1, 0.5), result(2, 2.0), result(3, 1.0), result(4, 1.0)];

        let out = finalize(results.clone(), Some(1.0), None);
        assert_eq!(ids(&out), vec![2]);

        let out = finalize(results, None, Some(3));
        assert_eq!(ids(&out), vec![2, 3, 4]);
    }

    #[test]
    fn test_query_by_property_fuzzy() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        let results = aggregator
            .query_by_property(&graph, "City", &fields(&["name"]), "york", None)
            .unwrap();
        let mut found = ids(&results);
        found.sort();
        assert_eq!(found, vec![0, 1]);
        assert!(results.iter().all(|r| r.score > 0.0));
        // Snapshots carry only the requested fields
        assert!(results.iter().all(|r| r.document.properties.len() == 1));
    }

    #[test]
    fn test_query_by_property_exact_scores_by_length() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        let results = aggregator
            .query_by_property(
                &graph,
                "City",
                &fields(&["name", "motto"]),
                "\"New York\"",
                None,
            )
            .unwrap();

        assert_eq!(ids(&results), vec![0, 1]);
        assert_eq!(results[0].score, 1.0 / 8.0);
        assert_eq!(results[1].score, 1.0 / 19.0);
    }

    #[test]
    fn test_query_missing_index_is_empty() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        let results = aggregator
            .query_by_property(&graph, "Nowhere", &fields(&["name"]), "york", None)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_query_by_label_merges_and_sorts() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        let results = aggregator
            .query_by_label(
                &graph,
                &fields(&["City", "Band"]),
                "\"New York\"",
                None,
                None,
            )
            .unwrap();

        // First-document discovery for City: name, country
        assert_eq!(ids(&results), vec![0, 3]);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_union_discovery_searches_every_key() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default().with_field_discovery(FieldDiscovery::Union);
        let aggregator = ResultAggregator::new(&store, &config);

        assert_eq!(
            aggregator.discover_fields(&graph, "City").unwrap(),
            vec!["country", "motto", "name"]
        );

        let results = aggregator
            .query_by_label(&graph, &fields(&["City"]), "younger", None, None)
            .unwrap();
        assert_eq!(ids(&results), vec![1]);
    }

    #[test]
    fn test_query_by_value_and_limit() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        let all = aggregator
            .query_by_value(&graph, "new york", None, None)
            .unwrap();
        assert!(ids(&all).contains(&3));

        let limited = aggregator
            .query_by_value(&graph, "new york", None, Some(1))
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0], all[0]);
    }

    #[test]
    fn test_stale_hit_is_skipped() {
        let (store, mut graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        graph.remove_node(NodeId(0));
        let results = aggregator
            .query_by_property(&graph, "City", &fields(&["name"]), "york", None)
            .unwrap();
        assert_eq!(ids(&results), vec![1]);
    }

    #[test]
    fn test_search_ranked() {
        let (store, graph, _dir) = setup();
        let config = EngineConfig::default();
        let aggregator = ResultAggregator::new(&store, &config);

        let results = aggregator
            .search_ranked(&graph, "City", "paris", 10)
            .unwrap();
        assert_eq!(ids(&results), vec![2]);
        assert_eq!(results[0].document.properties.len(), 2);

        assert!(aggregator
            .search_ranked(&graph, "Nowhere", "paris", 10)
            .unwrap()
            .is_empty());
    }

    proptest! {
        #[test]
        fn prop_finalize_is_sorted_filtered_and_bounded(
            scores in proptest::collection::vec(0.0f64..10.0, 0..40),
            min in proptest::option::of(0.0f64..10.0),
            limit in proptest::option::of(0usize..50),
        ) {
            let results: Vec<ScoredResult> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| result(i as u64, *s))
                .collect();
            let out = finalize(results, min, limit);

            for pair in out.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                // Stable: ties keep insertion order
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].document.id < pair[1].document.id);
                }
            }
            if let Some(min) = min {
                prop_assert!(out.iter().all(|r| r.score > min));
            }
            if let Some(limit) = limit {
                prop_assert!(out.len() <= limit);
            }
        }
    }
}
