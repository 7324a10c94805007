//! End-to-end test infrastructure for graph full-text search.
//!
//! Provides a shared TestHarness and helper functions for E2E tests
//! covering the full graph-to-index-to-query pipeline.

use std::path::PathBuf;

use fulltext_search::FullTextService;
use fulltext_storage::{GraphDb, MemoryGraph};
use fulltext_types::{EngineConfig, NodeId, PropertyMap, PropertyValue, ScoredResult, Settings};

/// Shared test harness for E2E tests.
///
/// Provides an in-memory graph, an index root and a service over it.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Graph the indexes are built from
    pub graph: MemoryGraph,
    /// Root directory for index files
    pub index_root: PathBuf,
    /// Service under test
    pub service: FullTextService,
}

impl TestHarness {
    /// Create a harness with the default engine configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a harness with a custom engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let index_root = temp_dir.path().join("indexes");
        let service = FullTextService::new(&index_root, config.with_writer_memory_mb(15));

        Self {
            _temp_dir: temp_dir,
            graph: MemoryGraph::new(),
            index_root,
            service,
        }
    }

    /// Add a node with string properties.
    pub fn add(&mut self, labels: &[&str], pairs: &[(&str, &str)]) -> NodeId {
        self.graph.add_node(labels.iter().copied(), props(pairs))
    }

    /// Open a RocksDB graph inside the harness temp dir.
    pub fn open_graph_db(&self) -> GraphDb {
        GraphDb::open(&self._temp_dir.path().join("graph")).expect("Failed to open graph db")
    }

    /// CLI settings pointing at this harness's directories.
    pub fn settings(&self) -> Settings {
        Settings {
            index_root: self.index_root.to_string_lossy().to_string(),
            graph_path: self
                ._temp_dir
                .path()
                .join("graph")
                .to_string_lossy()
                .to_string(),
            writer_memory_mb: 15,
            ..Default::default()
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a property map from string pairs.
pub fn props(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), PropertyValue::from(*v)))
        .collect()
}

/// Owned strings from string slices.
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Node ids of results, in result order.
pub fn result_ids(results: &[ScoredResult]) -> Vec<NodeId> {
    results.iter().map(|r| r.document.id).collect()
}

/// Count how many results belong to `id`.
pub fn occurrences(results: &[ScoredResult], id: NodeId) -> usize {
    results.iter().filter(|r| r.document.id == id).count()
}
