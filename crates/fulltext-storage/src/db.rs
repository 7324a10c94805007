//! RocksDB-backed graph store.
//!
//! Provides:
//! - Database open with column family setup
//! - Atomic node writes (record + label index in one batch)
//! - Id-ordered label scans via prefix iteration
//! - Snapshot import

use std::collections::BTreeSet;
use std::path::Path;

use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use tracing::{debug, info};

use fulltext_types::{Document, NodeId, PropertyMap};

use crate::column_families::{build_cf_descriptors, CF_LABELS, CF_NODES};
use crate::error::GraphError;
use crate::graph::{select_properties, DocumentIter, GraphStore};
use crate::keys::{LabelKey, NodeKey};
use crate::snapshot::{GraphSnapshot, NodeRecord};

/// Persistent property graph
pub struct GraphDb {
    db: DB,
}

impl GraphDb {
    /// Open the graph at the given path, creating it if necessary
    pub fn open(path: &Path) -> Result<Self, GraphError> {
        info!("Opening graph at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let db = DB::open_cf_descriptors(&db_opts, path, build_cf_descriptors())?;
        Ok(Self { db })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, GraphError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| GraphError::ColumnFamilyNotFound(name.to_string()))
    }

    /// Store a node, replacing any previous version and its label entries.
    pub fn put_node(&self, record: &NodeRecord) -> Result<(), GraphError> {
        let nodes_cf = self.cf(CF_NODES)?;
        let labels_cf = self.cf(CF_LABELS)?;

        let mut record = record.clone();
        record.labels.sort();
        record.labels.dedup();

        let mut batch = WriteBatch::default();
        if let Some(previous) = self.get_node(record.id)? {
            for label in &previous.labels {
                batch.delete_cf(labels_cf, LabelKey::new(label.as_str(), record.id).to_bytes());
            }
        }
        for label in &record.labels {
            batch.put_cf(labels_cf, LabelKey::new(label.as_str(), record.id).to_bytes(), b"");
        }
        batch.put_cf(
            nodes_cf,
            NodeKey(record.id).to_bytes(),
            serde_json::to_vec(&record)?,
        );

        self.db.write(batch)?;
        debug!(id = %record.id, labels = ?record.labels, "Stored node");
        Ok(())
    }

    /// Get a node by id
    pub fn get_node(&self, id: NodeId) -> Result<Option<NodeRecord>, GraphError> {
        let nodes_cf = self.cf(CF_NODES)?;
        match self.db.get_cf(nodes_cf, NodeKey(id).to_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn require_node(&self, id: NodeId) -> Result<NodeRecord, GraphError> {
        self.get_node(id)?.ok_or(GraphError::DocumentNotFound(id))
    }

    /// Delete a node and its label entries. Returns false if it was absent.
    pub fn delete_node(&self, id: NodeId) -> Result<bool, GraphError> {
        let Some(previous) = self.get_node(id)? else {
            return Ok(false);
        };
        let nodes_cf = self.cf(CF_NODES)?;
        let labels_cf = self.cf(CF_LABELS)?;

        let mut batch = WriteBatch::default();
        for label in &previous.labels {
            batch.delete_cf(labels_cf, LabelKey::new(label.as_str(), id).to_bytes());
        }
        batch.delete_cf(nodes_cf, NodeKey(id).to_bytes());
        self.db.write(batch)?;

        debug!(id = %id, "Deleted node");
        Ok(true)
    }

    /// Store every node of a snapshot. Returns the number of nodes written.
    pub fn import(&self, snapshot: &GraphSnapshot) -> Result<usize, GraphError> {
        for record in &snapshot.nodes {
            self.put_node(record)?;
        }
        info!(nodes = snapshot.nodes.len(), "Imported graph snapshot");
        Ok(snapshot.nodes.len())
    }

    /// Count stored nodes
    pub fn node_count(&self) -> Result<usize, GraphError> {
        let nodes_cf = self.cf(CF_NODES)?;
        let mut count = 0;
        for item in self.db.iterator_cf(nodes_cf, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

impl GraphStore for GraphDb {
    fn list_labels(&self) -> Result<Vec<String>, GraphError> {
        let labels_cf = self.cf(CF_LABELS)?;
        let mut labels = BTreeSet::new();
        for item in self.db.iterator_cf(labels_cf, IteratorMode::Start) {
            let (key, _) = item?;
            labels.insert(LabelKey::from_bytes(&key)?.label);
        }
        Ok(labels.into_iter().collect())
    }

    fn iterate_by_label(&self, label: &str) -> Result<DocumentIter<'_>, GraphError> {
        let labels_cf = self.cf(CF_LABELS)?;
        let prefix = LabelKey::prefix(label);
        let iter = self
            .db
            .iterator_cf(labels_cf, IteratorMode::From(&prefix, Direction::Forward));

        Ok(Box::new(
            iter.map(|item| item.map_err(GraphError::from))
                .take_while(move |item| match item {
                    Ok((key, _)) => key.starts_with(&prefix),
                    Err(_) => true,
                })
                .map(move |item| {
                    let (key, _) = item?;
                    let id = LabelKey::from_bytes(&key)?.node;
                    let record = self.require_node(id)?;
                    Ok(Document::with_properties(record.id, record.properties))
                }),
        ))
    }

    fn get_properties(
        &self,
        id: NodeId,
        keys: Option<&[String]>,
    ) -> Result<PropertyMap, GraphError> {
        let record = self.require_node(id)?;
        Ok(select_properties(&record.properties, keys))
    }

    fn labels_of(&self, id: NodeId) -> Result<Vec<String>, GraphError> {
        Ok(self.require_node(id)?.labels)
    }
}
