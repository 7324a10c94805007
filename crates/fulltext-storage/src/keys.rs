//! Key encoding and decoding for the RocksDB graph.
//!
//! Node key: 8-byte big-endian node id, so iteration is id-ordered.
//! Label key: `{label}\0{node id: 8-byte big-endian}`, so one label's
//! members form a contiguous, id-ordered prefix range.

use fulltext_types::NodeId;

use crate::error::GraphError;

const LABEL_SEPARATOR: u8 = 0;

/// Key for a node record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKey(pub NodeId);

impl NodeKey {
    pub fn to_bytes(&self) -> [u8; 8] {
        self.0 .0.to_be_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GraphError> {
        let raw: [u8; 8] = bytes
            .try_into()
            .map_err(|_| GraphError::Key(format!("node key must be 8 bytes, got {}", bytes.len())))?;
        Ok(NodeKey(NodeId(u64::from_be_bytes(raw))))
    }
}

/// Key for a label membership entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelKey {
    pub label: String,
    pub node: NodeId,
}

impl LabelKey {
    pub fn new(label: impl Into<String>, node: NodeId) -> Self {
        Self {
            label: label.into(),
            node,
        }
    }

    /// Prefix shared by every member of `label`.
    pub fn prefix(label: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(label.len() + 1);
        bytes.extend_from_slice(label.as_bytes());
        bytes.push(LABEL_SEPARATOR);
        bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Self::prefix(&self.label);
        bytes.extend_from_slice(&self.node.0.to_be_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GraphError> {
        if bytes.len() < 9 {
            return Err(GraphError::Key(format!(
                "label key too short: {} bytes",
                bytes.len()
            )));
        }
        let (head, id_bytes) = bytes.split_at(bytes.len() - 8);
        let (label_bytes, sep) = head.split_at(head.len() - 1);
        if sep[0] != LABEL_SEPARATOR {
            return Err(GraphError::Key("label key missing separator".into()));
        }
        let label = std::str::from_utf8(label_bytes)
            .map_err(|e| GraphError::Key(format!("Invalid UTF-8: {}", e)))?;
        let node = NodeKey::from_bytes(id_bytes)?.0;
        Ok(Self::new(label, node))
    }
}
