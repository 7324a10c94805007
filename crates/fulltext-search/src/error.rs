//! Search error types.

use fulltext_storage::GraphError;
use fulltext_types::AnalyzerConfig;
use thiserror::Error;

/// Errors raised by an analyzer while turning text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizationError {
    /// No analyzer is registered under this identifier
    #[error("Unknown analyzer: {0}")]
    UnknownAnalyzer(String),
}

/// Errors that can occur during indexing and search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// Query parse error
    #[error("Query parse error: {0}")]
    QueryParse(#[from] tantivy::query::QueryParserError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph store error
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Analyzer error
    #[error("Tokenization error: {0}")]
    Tokenization(#[from] TokenizationError),

    /// Descriptor file could not be read or written
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),

    /// An index of this name exists with a different analyzer configuration
    #[error("Index `{name}` already exists with analyzer {existing:?}, requested {requested:?}")]
    ConfigConflict {
        name: String,
        existing: AnalyzerConfig,
        requested: AnalyzerConfig,
    },

    /// Index name is empty
    #[error("Invalid index name: {0:?}")]
    InvalidIndexName(String),

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::InvalidIndexName(String::new());
        assert_eq!(err.to_string(), "Invalid index name: \"\"");

        let err: SearchError = TokenizationError::UnknownAnalyzer("ik".into()).into();
        assert_eq!(err.to_string(), "Tokenization error: Unknown analyzer: ik");
    }

    #[test]
    fn test_config_conflict_names_index() {
        let err = SearchError::ConfigConflict {
            name: "Person".to_string(),
            existing: AnalyzerConfig::standard(),
            requested: AnalyzerConfig::cjk(),
        };
        assert!(err.to_string().starts_with("Index `Person` already exists"));
    }

    #[test]
    fn test_from_graph_error() {
        let err: SearchError = GraphError::DocumentNotFound(fulltext_types::NodeId(4)).into();
        assert!(matches!(err, SearchError::Graph(GraphError::DocumentNotFound(_))));
    }
}
