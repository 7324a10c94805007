//! JSON graph snapshots used to seed a store.
//!
//! Format:
//! ```json
//! { "nodes": [ { "id": 1, "labels": ["Person"], "properties": { "name": "Alice" } } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use fulltext_types::{NodeId, PropertyMap};

use crate::error::GraphError;

/// One stored node: id, labels and all properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl NodeRecord {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A whole graph serialized as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = GraphSnapshot::from_json(
            r#"{"nodes":[
                {"id":1,"labels":["Person"],"properties":{"name":"Alice","age":30}},
                {"id":2,"labels":["Company"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.nodes.len(), 2);
        assert!(snapshot.nodes[0].has_label("Person"));
        assert!(snapshot.nodes[1].properties.is_empty());
    }

    #[test]
    fn test_parse_invalid_snapshot() {
        assert!(matches!(
            GraphSnapshot::from_json("{\"nodes\": 3}"),
            Err(GraphError::Serialization(_))
        ));
    }
}
