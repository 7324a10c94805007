//! Column family definitions for RocksDB.
//!
//! - nodes: node id -> JSON `NodeRecord`
//! - labels: `{label}\0{id}` -> empty, the label membership index

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for node records
pub const CF_NODES: &str = "nodes";

/// Column family name for the label membership index
pub const CF_LABELS: &str = "labels";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_NODES, CF_LABELS];

/// Create column family options for node records (compressed JSON)
fn nodes_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_NODES, nodes_options()),
        ColumnFamilyDescriptor::new(CF_LABELS, Options::default()),
    ]
}
