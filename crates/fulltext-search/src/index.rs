//! Tantivy index management for a single named index.
//!
//! Nothing is cached: every operation opens the index from disk and drops
//! it when done, so writes made by one call are visible to the next.

use std::path::{Path, PathBuf};

use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::{debug, info};

use fulltext_types::IndexDescriptor;

use crate::analyzer::Analyzers;
use crate::error::SearchError;
use crate::schema::{build_posting_schema, PostingSchema};

/// Default memory budget for IndexWriter (50MB)
pub const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// One opened label index with its schema and descriptor.
pub struct LabelIndex {
    index: Index,
    schema: PostingSchema,
    descriptor: IndexDescriptor,
    path: PathBuf,
    writer_memory_mb: usize,
}

impl LabelIndex {
    /// Open the index in `path`, creating it if absent.
    pub fn open_or_create(
        path: &Path,
        descriptor: IndexDescriptor,
        analyzers: &Analyzers,
        writer_memory_mb: usize,
    ) -> Result<Self, SearchError> {
        let index = if path.join("meta.json").exists() {
            debug!(path = ?path, "Opening existing index");
            Index::open_in_dir(path)?
        } else {
            info!(path = ?path, name = %descriptor.name, "Creating new index");
            std::fs::create_dir_all(path)?;
            let schema = build_posting_schema(descriptor.analyzer.analyzer_id());
            Index::create_in_dir(path, schema.schema().clone())?
        };
        analyzers.register_on(index.tokenizers());
        let schema = PostingSchema::from_schema(index.schema())?;

        Ok(Self {
            index,
            schema,
            descriptor,
            path: path.to_path_buf(),
            writer_memory_mb,
        })
    }

    /// Get the posting schema
    pub fn schema(&self) -> &PostingSchema {
        &self.schema
    }

    /// Get the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a single-threaded IndexWriter with the configured memory budget
    pub fn writer(&self) -> Result<IndexWriter, SearchError> {
        let memory_budget = self.writer_memory_mb * 1024 * 1024;
        let writer = self.index.writer_with_num_threads(1, memory_budget)?;
        debug!(
            index = %self.descriptor.name,
            memory_mb = self.writer_memory_mb,
            "Created index writer"
        );
        Ok(writer)
    }

    /// Create an IndexReader over the latest commit
    pub fn reader(&self) -> Result<IndexReader, SearchError> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(reader)
    }

    /// Number of live postings.
    pub fn num_postings(&self) -> Result<u64, SearchError> {
        Ok(self.reader()?.searcher().num_docs())
    }
}
