//! Posting writer for one label index.
//!
//! Documents are not visible until commit() is called.

use tantivy::{IndexWriter, Term};
use tracing::{debug, info, warn};

use fulltext_types::{NodeId, PropertyMap};

use crate::document::node_to_postings;
use crate::error::SearchError;
use crate::index::LabelIndex;
use crate::schema::PostingSchema;

/// Replaces the postings of nodes in one index.
pub struct PostingWriter {
    writer: IndexWriter,
    schema: PostingSchema,
}

impl PostingWriter {
    /// Create a writer for an opened index.
    pub fn new(index: &LabelIndex) -> Result<Self, SearchError> {
        let writer = index.writer()?;
        let schema = index.schema().clone();
        Ok(Self { writer, schema })
    }

    /// Replace every posting of `id` with one posting per property.
    ///
    /// Returns the number of postings added.
    pub fn replace_node(&self, id: NodeId, properties: &PropertyMap) -> Result<usize, SearchError> {
        self.delete_node(id);

        let postings = node_to_postings(&self.schema, id, properties);
        let count = postings.len();
        for doc in postings {
            self.writer.add_document(doc)?;
        }

        debug!(node_id = %id, postings = count, "Indexed node");
        Ok(count)
    }

    /// Remove every posting of `id`.
    pub fn delete_node(&self, id: NodeId) {
        let term = Term::from_field_u64(self.schema.node_id, id.as_u64());
        self.writer.delete_term(term);
    }

    /// Commit pending changes to make them searchable.
    pub fn commit(&mut self) -> Result<u64, SearchError> {
        let opstamp = self.writer.commit()?;
        info!(opstamp, "Committed index changes");
        Ok(opstamp)
    }

    /// Rollback uncommitted changes.
    pub fn rollback(&mut self) -> Result<u64, SearchError> {
        let opstamp = self.writer.rollback()?;
        warn!(opstamp, "Rolled back index changes");
        Ok(opstamp)
    }
}
