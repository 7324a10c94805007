//! Index descriptors and analyzer configuration.
//!
//! An index is bound to exactly one analyzer configuration for its whole
//! life. Changing the analyzer means deleting and recreating the index.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Provider identifier written into every analyzer configuration.
pub const PROVIDER: &str = "tantivy";

/// Analyzer identifier of the standard (Unicode word) analyzer.
pub const STANDARD_ANALYZER: &str = "standard";

/// Analyzer identifier of the CJK-aware (jieba) analyzer.
pub const CJK_ANALYZER: &str = "jieba";

/// Analyzer identifier used by exact indexes.
pub const KEYWORD_ANALYZER: &str = "keyword";

/// Kind of graph entity an index covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexKind {
    Node,
    Relationship,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Node => "NODE",
            IndexKind::Relationship => "RELATIONSHIP",
        }
    }

    /// Directory component under the index root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            IndexKind::Node => "node",
            IndexKind::Relationship => "relationship",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether values are tokenized or matched whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Fulltext,
    Exact,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Fulltext => "fulltext",
            IndexType::Exact => "exact",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fulltext" => Some(IndexType::Fulltext),
            "exact" => Some(IndexType::Exact),
            _ => None,
        }
    }
}

/// Analyzer configuration an index is created with.
///
/// Serializes to the flat `provider` / `type` / `analyzer` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub provider: String,
    #[serde(rename = "type")]
    pub index_type: IndexType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

impl AnalyzerConfig {
    /// Standard word analyzer: Unicode word split, long-token removal, lowercasing.
    pub fn standard() -> Self {
        Self {
            provider: PROVIDER.to_string(),
            index_type: IndexType::Fulltext,
            analyzer: Some(STANDARD_ANALYZER.to_string()),
        }
    }

    /// CJK-aware analyzer backed by jieba segmentation.
    pub fn cjk() -> Self {
        Self {
            provider: PROVIDER.to_string(),
            index_type: IndexType::Fulltext,
            analyzer: Some(CJK_ANALYZER.to_string()),
        }
    }

    /// Untokenized exact-value index.
    pub fn exact() -> Self {
        Self {
            provider: PROVIDER.to_string(),
            index_type: IndexType::Exact,
            analyzer: None,
        }
    }

    /// Effective analyzer identifier.
    pub fn analyzer_id(&self) -> &str {
        match (&self.analyzer, self.index_type) {
            (_, IndexType::Exact) => KEYWORD_ANALYZER,
            (Some(name), IndexType::Fulltext) => name,
            (None, IndexType::Fulltext) => STANDARD_ANALYZER,
        }
    }

    /// Flatten into the string mapping reported for each index.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("provider".to_string(), self.provider.clone());
        map.insert("type".to_string(), self.index_type.as_str().to_string());
        if let Some(analyzer) = &self.analyzer {
            map.insert("analyzer".to_string(), analyzer.clone());
        }
        map
    }

    /// Parse from the flat string mapping. `provider` defaults to tantivy.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, TypesError> {
        let type_str = map
            .get("type")
            .ok_or_else(|| TypesError::InvalidAnalyzer("missing `type`".into()))?;
        let index_type = IndexType::parse(type_str)
            .ok_or_else(|| TypesError::InvalidAnalyzer(format!("unknown type: {}", type_str)))?;
        Ok(Self {
            provider: map
                .get("provider")
                .cloned()
                .unwrap_or_else(|| PROVIDER.to_string()),
            index_type,
            analyzer: map.get("analyzer").cloned(),
        })
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Persistent description of one named index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub name: String,
    pub kind: IndexKind,
    pub analyzer: AnalyzerConfig,
    pub created_at: DateTime<Utc>,
}

impl IndexDescriptor {
    pub fn new(name: impl Into<String>, kind: IndexKind, analyzer: AnalyzerConfig) -> Self {
        Self {
            name: name.into(),
            kind,
            analyzer,
            created_at: Utc::now(),
        }
    }

    /// Analyzer configuration as the reported string mapping.
    pub fn config(&self) -> BTreeMap<String, String> {
        self.analyzer.to_map()
    }
}
