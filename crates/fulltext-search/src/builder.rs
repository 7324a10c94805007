//! Index building from the graph.
//!
//! Every write replaces a node's postings wholesale: old postings are
//! deleted, then one posting is added per property present on the node.
//! Re-indexing the same document is therefore idempotent.

use serde::Serialize;
use tracing::{debug, info, warn};

use fulltext_storage::{select_properties, GraphStore};
use fulltext_types::{AnalyzerConfig, IndexKind, NodeId};

use crate::error::SearchError;
use crate::indexer::PostingWriter;
use crate::store::IndexStore;

/// Counts from one build operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Documents (re-)indexed
    pub documents: usize,
    /// Postings written
    pub postings: usize,
}

impl BuildStats {
    pub fn merge(&mut self, other: BuildStats) {
        self.documents += other.documents;
        self.postings += other.postings;
    }
}

/// Writes graph documents into label indexes.
pub struct IndexBuilder<'a> {
    store: &'a IndexStore,
    analyzer: AnalyzerConfig,
}

impl<'a> IndexBuilder<'a> {
    /// `analyzer` is used for indexes created on first write.
    pub fn new(store: &'a IndexStore, analyzer: AnalyzerConfig) -> Self {
        Self { store, analyzer }
    }

    /// Re-index one document into each target index.
    ///
    /// Empty `fields` means every property. Missing target indexes are
    /// created. A document that cannot be read fails the call.
    pub fn index_document(
        &self,
        graph: &dyn GraphStore,
        id: NodeId,
        fields: &[String],
        targets: &[String],
    ) -> Result<BuildStats, SearchError> {
        let properties = graph.get_properties(id, field_filter(fields))?;
        let mut stats = BuildStats::default();
        for target in targets {
            let index = self.store.ensure(IndexKind::Node, target, &self.analyzer)?;
            let mut writer = PostingWriter::new(&index)?;
            stats.postings += writer.replace_node(id, &properties)?;
            writer.commit()?;
        }
        stats.documents = usize::from(!targets.is_empty());

        debug!(node_id = %id, targets = targets.len(), "Re-indexed document");
        Ok(stats)
    }

    /// Re-index every document with `label` into one index.
    ///
    /// The index is named `index_name`, or after the label if `None`.
    /// Each document's properties come from the label iteration itself.
    /// Work is committed as it goes: if a document fails, the documents
    /// before it stay indexed and the error is returned.
    pub fn index_all_by_label(
        &self,
        graph: &dyn GraphStore,
        label: &str,
        fields: &[String],
        index_name: Option<&str>,
    ) -> Result<BuildStats, SearchError> {
        let name = index_name.unwrap_or(label);
        let index = self.store.ensure(IndexKind::Node, name, &self.analyzer)?;
        let mut writer = PostingWriter::new(&index)?;

        let mut stats = BuildStats::default();
        let outcome = (|| -> Result<(), SearchError> {
            for document in graph.iterate_by_label(label)? {
                let document = document?;
                let properties = select_properties(&document.properties, field_filter(fields));
                stats.postings += writer.replace_node(document.id, &properties)?;
                stats.documents += 1;
            }
            Ok(())
        })();

        if let Err(e) = outcome {
            warn!(
                index = name,
                label,
                indexed = stats.documents,
                error = %e,
                "Label build failed partway"
            );
            if let Err(commit_err) = writer.commit() {
                warn!(index = name, error = %commit_err, "Failed to commit partial build");
            }
            return Err(e);
        }

        writer.commit()?;
        info!(
            index = name,
            label,
            documents = stats.documents,
            postings = stats.postings,
            "Indexed label"
        );
        Ok(stats)
    }
}

fn field_filter(fields: &[String]) -> Option<&[String]> {
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}
