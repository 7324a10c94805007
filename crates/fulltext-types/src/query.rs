//! Query requests, scored results and token spans.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// One query over one or more indexes. Built per call, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryRequest {
    /// Indexes to run against, duplicates removed, first occurrence kept
    pub target_indexes: Vec<String>,
    /// Property fields to search, in order
    pub property_fields: Vec<String>,
    /// Raw query value as typed by the caller
    pub raw_value: String,
    /// Keep only results scoring strictly above this
    pub min_score: Option<f64>,
    /// Keep at most this many results after sorting
    pub limit: Option<usize>,
}

impl QueryRequest {
    pub fn new(raw_value: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.target_indexes.contains(&name) {
            self.target_indexes.push(name);
        }
        self
    }

    pub fn with_indexes<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |req, name| req.with_index(name))
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.property_fields.contains(&field) {
                self.property_fields.push(field);
            }
        }
        self
    }

    pub fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// A document with its relevance score for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub document: Document,
    pub score: f64,
}

impl ScoredResult {
    pub fn new(document: Document, score: f64) -> Self {
        Self { document, score }
    }
}

/// One token produced by an analyzer. Offsets are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub term: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TokenSpan {
    pub fn new(term: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            term: term.into(),
            start_offset,
            end_offset,
        }
    }
}
