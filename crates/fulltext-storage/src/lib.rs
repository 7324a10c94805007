//! # fulltext-storage
//!
//! The graph store the search core indexes from.
//!
//! The core never talks to a storage engine directly. It only calls the
//! narrow [`GraphStore`] capability interface: list labels, iterate the
//! documents of a label, fetch (a subset of) one document's properties,
//! and list the labels one document carries.
//!
//! Two implementations are provided:
//! - [`MemoryGraph`]: in-process maps, used by tests and embedding callers
//! - [`GraphDb`]: RocksDB with one column family for nodes and one for the
//!   label index, used by the CLI

pub mod column_families;
pub mod db;
pub mod error;
pub mod graph;
pub mod keys;
pub mod memory;
pub mod snapshot;

pub use db::GraphDb;
pub use error::GraphError;
pub use graph::{select_properties, DocumentIter, GraphStore};
pub use memory::MemoryGraph;
pub use snapshot::{GraphSnapshot, NodeRecord};
