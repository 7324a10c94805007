//! Query planning: raw value in, per-field match plan out.
//!
//! A raw value wrapped in one pair of double quotes asks for an exact
//! match on the literal between them. Anything else is a fuzzy query:
//! the value is tokenized with the index analyzer and every token becomes
//! a required term.

use std::fmt::Write as _;

use tracing::warn;

use fulltext_types::{AnalyzerConfig, FuzzyEncoding, TokenSpan};

use crate::analyzer::Analyzers;

/// How a plan's value is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Fuzzy,
    Exact,
}

/// What the value of every field clause must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValue {
    /// Every marker is a required term.
    Required(Vec<String>),
    /// The literal, plus its analyzer tokens in order for phrase matching.
    Phrase { literal: String, terms: Vec<String> },
}

/// One `field:(value)` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldClause {
    pub field: String,
    pub value: String,
}

/// A planned query over a set of fields. Clauses are OR-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub mode: MatchMode,
    pub value: PlanValue,
    pub fields: Vec<String>,
}

impl QueryPlan {
    /// The value every clause carries.
    ///
    /// Fuzzy: each marker as `+marker `. Exact: the bare literal.
    pub fn encoded_value(&self) -> String {
        match &self.value {
            PlanValue::Required(markers) => markers.iter().fold(String::new(), |mut out, m| {
                let _ = write!(out, "+{} ", m);
                out
            }),
            PlanValue::Phrase { literal, .. } => literal.clone(),
        }
    }

    pub fn clauses(&self) -> Vec<FieldClause> {
        let value = self.encoded_value();
        self.fields
            .iter()
            .map(|field| FieldClause {
                field: field.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// Textual form: `field:(value) ` per field, concatenated.
    pub fn render(&self) -> String {
        self.clauses()
            .iter()
            .fold(String::new(), |mut out, clause| {
                let _ = write!(out, "{}:({}) ", clause.field, clause.value);
                out
            })
    }

    /// Literal to score exact matches against.
    pub fn exact_literal(&self) -> Option<&str> {
        match &self.value {
            PlanValue::Phrase { literal, .. } => Some(literal),
            PlanValue::Required(_) => None,
        }
    }

    /// A plan with no fields or no terms matches nothing.
    pub fn matches_nothing(&self) -> bool {
        self.fields.is_empty()
            || match &self.value {
                PlanValue::Required(markers) => markers.is_empty(),
                PlanValue::Phrase { terms, .. } => terms.is_empty(),
            }
    }
}

/// Strip one surrounding pair of double quotes, if present.
///
/// The value is trimmed first and must be at least two characters long.
pub fn exact_literal(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}

/// Turns raw query values into plans.
#[derive(Debug, Clone)]
pub struct QueryPlanner<'a> {
    analyzers: &'a Analyzers,
    encoding: FuzzyEncoding,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(analyzers: &'a Analyzers, encoding: FuzzyEncoding) -> Self {
        Self {
            analyzers,
            encoding,
        }
    }

    /// Plan `raw` over `fields`, tokenizing with `analyzer`.
    ///
    /// Tokenizer failures degrade to an empty value and are logged.
    pub fn plan(&self, raw: &str, fields: &[String], analyzer: &AnalyzerConfig) -> QueryPlan {
        let (mode, value) = match exact_literal(raw) {
            Some(literal) => (
                MatchMode::Exact,
                PlanValue::Phrase {
                    literal: literal.to_string(),
                    terms: self
                        .tokens(analyzer, literal)
                        .into_iter()
                        .map(|span| span.term)
                        .collect(),
                },
            ),
            None => (
                MatchMode::Fuzzy,
                PlanValue::Required(
                    self.tokens(analyzer, raw)
                        .iter()
                        .map(|span| self.encode(span))
                        .collect(),
                ),
            ),
        };

        QueryPlan {
            mode,
            value,
            fields: fields.to_vec(),
        }
    }

    fn tokens(&self, analyzer: &AnalyzerConfig, text: &str) -> Vec<TokenSpan> {
        match self.analyzers.tokenize(analyzer.analyzer_id(), text) {
            Ok(spans) => spans,
            Err(e) => {
                warn!(error = %e, "Tokenization failed, querying with an empty value");
                Vec::new()
            }
        }
    }

    fn encode(&self, span: &TokenSpan) -> String {
        match self.encoding {
            FuzzyEncoding::Terms => span.term.clone(),
            FuzzyEncoding::Offsets => format!(
                "startOffset={},endOffset={}",
                span.start_offset, span.end_offset
            ),
        }
    }
}
