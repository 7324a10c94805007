//! Capability interface the search core reads the graph through.

use fulltext_types::{Document, NodeId, PropertyMap};

use crate::error::GraphError;

/// Lazy sequence of documents, each carrying all of its properties.
pub type DocumentIter<'a> = Box<dyn Iterator<Item = Result<Document, GraphError>> + 'a>;

/// Read access to a property graph.
///
/// Implementations run every call against their current state; callers
/// must not assume anything is cached between calls.
pub trait GraphStore {
    /// Every label carried by at least one node, sorted.
    fn list_labels(&self) -> Result<Vec<String>, GraphError>;

    /// Documents carrying `label`, in ascending id order.
    ///
    /// An unknown label yields an empty sequence.
    fn iterate_by_label(&self, label: &str) -> Result<DocumentIter<'_>, GraphError>;

    /// Properties of one node in a single fetch.
    ///
    /// With `keys`, only those keys the node actually has are returned.
    /// Fails with [`GraphError::DocumentNotFound`] if the node is gone.
    fn get_properties(&self, id: NodeId, keys: Option<&[String]>)
        -> Result<PropertyMap, GraphError>;

    /// Labels carried by one node, sorted.
    fn labels_of(&self, id: NodeId) -> Result<Vec<String>, GraphError>;

    /// Snapshot of one node as a [`Document`].
    fn get_document(&self, id: NodeId, keys: Option<&[String]>) -> Result<Document, GraphError> {
        Ok(Document::with_properties(id, self.get_properties(id, keys)?))
    }
}

/// Keep only the requested keys of a full property map.
pub fn select_properties(properties: &PropertyMap, keys: Option<&[String]>) -> PropertyMap {
    match keys {
        None => properties.clone(),
        Some(keys) => keys
            .iter()
            .filter_map(|k| properties.get(k).map(|v| (k.clone(), v.clone())))
            .collect(),
    }
}
