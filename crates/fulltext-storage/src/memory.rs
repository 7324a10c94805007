//! In-process graph store.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use fulltext_types::{Document, NodeId, PropertyMap, PropertyValue};

use crate::error::GraphError;
use crate::graph::{select_properties, DocumentIter, GraphStore};
use crate::snapshot::{GraphSnapshot, NodeRecord};

/// Property graph held in ordered maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<NodeId, NodeRecord>,
    next_id: u64,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        for record in snapshot.nodes {
            graph.insert(record);
        }
        graph
    }

    /// Create a node with the next free id.
    pub fn add_node<I, S>(&mut self, labels: I, properties: PropertyMap) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = NodeId(self.next_id);
        let mut record = NodeRecord::new(id);
        record.labels = labels.into_iter().map(Into::into).collect();
        record.properties = properties;
        self.insert(record);
        id
    }

    /// Insert or replace a node under its own id.
    pub fn insert(&mut self, mut record: NodeRecord) {
        record.labels.sort();
        record.labels.dedup();
        self.next_id = self.next_id.max(record.id.0 + 1);
        debug!(id = %record.id, labels = ?record.labels, "Stored node");
        self.nodes.insert(record.id, record);
    }

    pub fn set_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<(), GraphError> {
        let record = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::DocumentNotFound(id))?;
        record.properties.insert(key.into(), value.into());
        Ok(())
    }

    pub fn remove_property(&mut self, id: NodeId, key: &str) -> Result<(), GraphError> {
        let record = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::DocumentNotFound(id))?;
        record.properties.remove(key);
        Ok(())
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<NodeRecord> {
        self.nodes.remove(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl GraphStore for MemoryGraph {
    fn list_labels(&self) -> Result<Vec<String>, GraphError> {
        let labels: BTreeSet<&String> = self.nodes.values().flat_map(|n| &n.labels).collect();
        Ok(labels.into_iter().cloned().collect())
    }

    fn iterate_by_label(&self, label: &str) -> Result<DocumentIter<'_>, GraphError> {
        let label = label.to_string();
        Ok(Box::new(
            self.nodes
                .values()
                .filter(move |n| n.has_label(&label))
                .map(|n| Ok::<_, GraphError>(Document::with_properties(n.id, n.properties.clone()))),
        ))
    }

    fn get_properties(
        &self,
        id: NodeId,
        keys: Option<&[String]>,
    ) -> Result<PropertyMap, GraphError> {
        let record = self.nodes.get(&id).ok_or(GraphError::DocumentNotFound(id))?;
        Ok(select_properties(&record.properties, keys))
    }

    fn labels_of(&self, id: NodeId) -> Result<Vec<String>, GraphError> {
        let record = self.nodes.get(&id).ok_or(GraphError::DocumentNotFound(id))?;
        Ok(record.labels.clone())
    }
}
