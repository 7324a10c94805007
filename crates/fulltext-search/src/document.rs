//! Mapping from graph documents to Tantivy postings.

use tantivy::doc;
use tantivy::schema::Value;
use tantivy::TantivyDocument;

use fulltext_types::{NodeId, PropertyMap};

use crate::schema::PostingSchema;

/// Convert one node's properties to postings, one per property.
///
/// Values are indexed as text; lists are joined with spaces.
pub fn node_to_postings(
    schema: &PostingSchema,
    id: NodeId,
    properties: &PropertyMap,
) -> Vec<TantivyDocument> {
    properties
        .iter()
        .map(|(key, value)| {
            doc!(
                schema.node_id => id.as_u64(),
                schema.key => key.as_str(),
                schema.value => value.to_index_text()
            )
        })
        .collect()
}

/// Read the owning node id back from a stored posting.
pub fn posting_node_id(schema: &PostingSchema, doc: &TantivyDocument) -> Option<NodeId> {
    doc.get_first(schema.node_id)
        .and_then(|v| v.as_u64())
        .map(NodeId)
}
