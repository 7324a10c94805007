//! # fulltext-search
//!
//! Per-label full-text indexing and ranked querying over a property graph
//! using Tantivy.
//!
//! Each named index holds postings, one per (node, property key, property
//! value) triple, tokenized by the analyzer the index was created with.
//! Queries are planned per index, executed per field, scored and merged
//! across indexes by descending relevance.
//!
//! ## Features
//! - Embedded Tantivy indexes, one directory per index, reopened per call
//! - Standard, jieba (CJK) and keyword analyzers
//! - Fuzzy (all terms required) and exact (quoted literal) matching
//! - Exact-match scores favouring the shortest containing value
//! - Score threshold and limit over merged multi-label results

pub mod aggregator;
pub mod analyzer;
pub mod builder;
pub mod document;
pub mod error;
pub mod index;
pub mod indexer;
pub mod planner;
pub mod schema;
pub mod scorer;
pub mod searcher;
pub mod service;
pub mod store;

pub use aggregator::{finalize, ResultAggregator};
pub use analyzer::{Analyzers, JiebaTokenizer};
pub use builder::{BuildStats, IndexBuilder};
pub use error::{SearchError, TokenizationError};
pub use index::LabelIndex;
pub use indexer::PostingWriter;
pub use planner::{exact_literal, FieldClause, MatchMode, PlanValue, QueryPlan, QueryPlanner};
pub use schema::{build_posting_schema, PostingSchema};
pub use scorer::exact_score;
pub use searcher::{NodeHit, PostingSearcher};
pub use service::{FullTextService, IndexInfo};
pub use store::{index_dir_name, validate_index_name, IndexStore};
