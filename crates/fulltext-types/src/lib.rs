//! # fulltext-types
//!
//! Shared domain types for graph full-text indexing.
//!
//! This crate defines the data model used throughout the system:
//! - Documents: a graph node id plus a snapshot of its properties
//! - Index descriptors: name, kind and analyzer configuration of an index
//! - Queries and results: query requests, scored results, token spans
//! - Settings: layered configuration and the engine configuration derived from it
//!
//! ## Usage
//!
//! ```rust
//! use fulltext_types::{AnalyzerConfig, Document, NodeId};
//!
//! let doc = Document::new(NodeId(7)).with_property("name", "Alice");
//! assert_eq!(AnalyzerConfig::standard().analyzer_id(), "standard");
//! assert!(doc.properties.contains_key("name"));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod query;

pub use config::{AnalyzerPreset, EngineConfig, FieldDiscovery, FuzzyEncoding, Settings};
pub use document::{Document, NodeId, PropertyMap, PropertyValue};
pub use error::TypesError;
pub use index::{AnalyzerConfig, IndexDescriptor, IndexKind, IndexType};
pub use query::{QueryRequest, ScoredResult, TokenSpan};
