//! Operation surface over one index root.
//!
//! `FullTextService` owns the index store and engine configuration and
//! exposes the indexing, querying and lifecycle operations. The graph is
//! passed to each call; nothing about it is cached between calls.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use fulltext_storage::GraphStore;
use fulltext_types::{EngineConfig, IndexDescriptor, IndexKind, NodeId, ScoredResult};

use crate::aggregator::ResultAggregator;
use crate::builder::{BuildStats, IndexBuilder};
use crate::error::SearchError;
use crate::searcher::PostingSearcher;
use crate::store::IndexStore;

/// Reported form of an index: kind, name and flat analyzer mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    #[serde(rename = "type")]
    pub kind: IndexKind,
    pub name: String,
    pub config: BTreeMap<String, String>,
}

impl From<&IndexDescriptor> for IndexInfo {
    fn from(descriptor: &IndexDescriptor) -> Self {
        Self {
            kind: descriptor.kind,
            name: descriptor.name.clone(),
            config: descriptor.config(),
        }
    }
}

/// Full-text indexing and querying over a property graph.
#[derive(Debug, Clone)]
pub struct FullTextService {
    store: IndexStore,
    config: EngineConfig,
}

impl FullTextService {
    pub fn new(index_root: impl Into<PathBuf>, config: EngineConfig) -> Self {
        let store = IndexStore::new(index_root).with_memory_mb(config.writer_memory_mb);
        Self { store, config }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn builder(&self) -> IndexBuilder<'_> {
        IndexBuilder::new(&self.store, self.config.analyzer.clone())
    }

    fn aggregator(&self) -> ResultAggregator<'_> {
        ResultAggregator::new(&self.store, &self.config)
    }

    // Queries

    /// Ids of the nodes in the index named `label` matching a raw query.
    pub fn search(&self, label: &str, query: &str) -> Result<Vec<NodeId>, SearchError> {
        let Some(index) = self.store.find(IndexKind::Node, label)? else {
            debug!(index = label, "Skipping search, index does not exist");
            return Ok(Vec::new());
        };
        let searcher = PostingSearcher::new(&index)?;
        let limit = index.num_postings()? as usize;
        Ok(searcher
            .search_raw(query, limit)?
            .into_iter()
            .map(|hit| hit.node)
            .collect())
    }

    /// Top `limit` documents of one index for a raw query, with scores.
    pub fn search_ranked(
        &self,
        graph: &dyn GraphStore,
        index: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        self.aggregator().search_ranked(graph, index, query, limit)
    }

    pub fn query_by_property(
        &self,
        graph: &dyn GraphStore,
        index: &str,
        fields: &[String],
        value: &str,
        min_score: Option<f64>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        self.aggregator()
            .query_by_property(graph, index, fields, value, min_score)
    }

    pub fn query_by_label(
        &self,
        graph: &dyn GraphStore,
        labels: &[String],
        value: &str,
        min_score: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        self.aggregator()
            .query_by_label(graph, labels, value, min_score, limit)
    }

    pub fn query_by_value(
        &self,
        graph: &dyn GraphStore,
        value: &str,
        min_score: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        self.aggregator()
            .query_by_value(graph, value, min_score, limit)
    }

    // Indexing

    /// Re-index one node under every label it carries.
    ///
    /// Empty `keys` indexes every property.
    pub fn index(
        &self,
        graph: &dyn GraphStore,
        id: NodeId,
        keys: &[String],
    ) -> Result<BuildStats, SearchError> {
        let labels = graph.labels_of(id)?;
        self.builder().index_document(graph, id, keys, &labels)
    }

    /// Build index `index` from the `keys` of every node with `label`.
    pub fn add_index(
        &self,
        graph: &dyn GraphStore,
        index: &str,
        label: &str,
        keys: &[String],
    ) -> Result<BuildStats, SearchError> {
        self.builder()
            .index_all_by_label(graph, label, keys, Some(index))
    }

    /// Index every property of every node with `label`.
    pub fn add_nodes_index_by_label(
        &self,
        graph: &dyn GraphStore,
        label: &str,
    ) -> Result<BuildStats, SearchError> {
        self.builder().index_all_by_label(graph, label, &[], None)
    }

    pub fn add_nodes_index_by_labels(
        &self,
        graph: &dyn GraphStore,
        labels: &[String],
    ) -> Result<BuildStats, SearchError> {
        let mut stats = BuildStats::default();
        for label in labels {
            stats.merge(self.add_nodes_index_by_label(graph, label)?);
        }
        Ok(stats)
    }

    /// Index every label in the graph.
    pub fn add_nodes_index(&self, graph: &dyn GraphStore) -> Result<BuildStats, SearchError> {
        let labels = graph.list_labels()?;
        let stats = self.add_nodes_index_by_labels(graph, &labels)?;
        info!(
            labels = labels.len(),
            documents = stats.documents,
            "Indexed all labels"
        );
        Ok(stats)
    }

    /// Index, per label, only the listed properties.
    ///
    /// The keys indexed for a label are those of its first node that
    /// appear in `properties`. Labels sharing none are skipped.
    pub fn add_nodes_index_by_properties(
        &self,
        graph: &dyn GraphStore,
        properties: &[String],
    ) -> Result<BuildStats, SearchError> {
        let mut stats = BuildStats::default();
        for label in graph.list_labels()? {
            let Some(first) = graph.iterate_by_label(&label)?.next() else {
                continue;
            };
            let keys: Vec<String> = first?
                .keys()
                .filter(|k| properties.iter().any(|p| p == k))
                .map(str::to_string)
                .collect();
            if keys.is_empty() {
                debug!(label = %label, "Label has none of the requested properties");
                continue;
            }
            stats.merge(self.add_index(graph, &label, &label, &keys)?);
        }
        Ok(stats)
    }

    // Lifecycle

    /// Names of every index of `kind`, sorted.
    pub fn list_indexes(&self, kind: IndexKind) -> Result<Vec<String>, SearchError> {
        self.store.list_names(kind)
    }

    /// Delete every index of every kind.
    pub fn remove_index(&self) -> Result<Vec<IndexInfo>, SearchError> {
        let mut removed = Vec::new();
        for kind in [IndexKind::Node, IndexKind::Relationship] {
            for name in self.store.list_names(kind)? {
                if let Some(descriptor) = self.store.delete(kind, &name)? {
                    removed.push(IndexInfo::from(&descriptor));
                }
            }
        }
        info!(count = removed.len(), "Removed all indexes");
        Ok(removed)
    }

    /// Delete the node index `name`, if present.
    pub fn remove_index_by_label(&self, name: &str) -> Result<Vec<IndexInfo>, SearchError> {
        Ok(self
            .store
            .delete(IndexKind::Node, name)?
            .iter()
            .map(IndexInfo::from)
            .collect())
    }
}
