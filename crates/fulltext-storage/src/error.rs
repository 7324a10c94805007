//! Graph store error types.

use fulltext_types::NodeId;
use thiserror::Error;

/// Errors that can occur while reading or writing the graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// The node id does not exist (deleted or out of range)
    #[error("Document not found: {0}")]
    DocumentNotFound(NodeId),

    /// RocksDB operation failed
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Key encoding/decoding error
    #[error("Key error: {0}")]
    Key(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error (snapshot files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Serialization(err.to_string())
    }
}
