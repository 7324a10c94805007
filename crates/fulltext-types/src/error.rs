//! Error types for the shared domain model.

use thiserror::Error;

/// Errors raised while building or validating domain types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid analyzer configuration map
    #[error("Invalid analyzer configuration: {0}")]
    InvalidAnalyzer(String),
}
