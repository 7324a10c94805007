//! Plan execution against one label index.
//!
//! Tantivy scores postings; a node's native score is the sum of the
//! scores of its matching postings. Hits come back grouped per node,
//! highest native score first.

use std::collections::HashMap;

use tantivy::collector::TopDocs;
use tantivy::query::{
    BooleanQuery, ConstScoreQuery, Occur, PhraseQuery, Query, QueryParser, TermQuery,
};
use tantivy::schema::IndexRecordOption;
use tantivy::{IndexReader, Searcher, TantivyDocument, Term};
use tracing::{debug, info, warn};

use fulltext_types::NodeId;

use crate::document::posting_node_id;
use crate::error::SearchError;
use crate::index::LabelIndex;
use crate::planner::{PlanValue, QueryPlan};
use crate::schema::PostingSchema;

/// A node matched by a query with its native relevance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeHit {
    pub node: NodeId,
    pub score: f64,
}

/// Runs planned and raw queries against one index.
pub struct PostingSearcher {
    reader: IndexReader,
    schema: PostingSchema,
    query_parser: QueryParser,
    name: String,
}

impl PostingSearcher {
    /// Create a new searcher over the latest commit of `index`.
    pub fn new(index: &LabelIndex) -> Result<Self, SearchError> {
        let reader = index.reader()?;
        let schema = index.schema().clone();

        // Raw queries search values; `key:` stays addressable
        let query_parser = QueryParser::for_index(index.index(), vec![schema.value]);

        Ok(Self {
            reader,
            schema,
            query_parser,
            name: index.name().to_string(),
        })
    }

    /// Execute a plan. Every node matching any field clause is returned.
    pub fn search_plan(&self, plan: &QueryPlan) -> Result<Vec<NodeHit>, SearchError> {
        if plan.matches_nothing() {
            debug!(index = %self.name, "Plan matches nothing");
            return Ok(Vec::new());
        }
        let Some(query) = self.build_query(plan) else {
            return Ok(Vec::new());
        };

        let hits = self.collect(&query)?;
        info!(
            index = %self.name,
            mode = ?plan.mode,
            fields = plan.fields.len(),
            results = hits.len(),
            "Plan search complete"
        );
        Ok(hits)
    }

    /// Parse and execute a raw query string, keeping the top `limit` nodes.
    pub fn search_raw(&self, query_str: &str, limit: usize) -> Result<Vec<NodeHit>, SearchError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query = self.query_parser.parse_query(query_str)?;
        let mut hits = self.collect(&query)?;
        hits.truncate(limit);

        info!(
            index = %self.name,
            query = query_str,
            results = hits.len(),
            "Raw search complete"
        );
        Ok(hits)
    }

    fn build_query(&self, plan: &QueryPlan) -> Option<Box<dyn Query>> {
        let clauses: Vec<(Occur, Box<dyn Query>)> = plan
            .fields
            .iter()
            .filter_map(|field| {
                let value_query = self.value_query(&plan.value)?;
                let key_filter = ConstScoreQuery::new(
                    Box::new(TermQuery::new(
                        Term::from_field_text(self.schema.key, field),
                        IndexRecordOption::Basic,
                    )),
                    0.0,
                );
                let clause: Box<dyn Query> = Box::new(BooleanQuery::new(vec![
                    (Occur::Must, Box::new(key_filter) as Box<dyn Query>),
                    (Occur::Must, value_query),
                ]));
                Some((Occur::Should, clause))
            })
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(Box::new(BooleanQuery::new(clauses)))
        }
    }

    fn value_query(&self, value: &PlanValue) -> Option<Box<dyn Query>> {
        let term = |text: &str| Term::from_field_text(self.schema.value, text);
        match value {
            PlanValue::Required(markers) if !markers.is_empty() => {
                let required = markers
                    .iter()
                    .map(|m| {
                        let query: Box<dyn Query> =
                            Box::new(TermQuery::new(term(m), IndexRecordOption::WithFreqs));
                        (Occur::Must, query)
                    })
                    .collect();
                Some(Box::new(BooleanQuery::new(required)))
            }
            PlanValue::Phrase { terms, .. } => match terms.as_slice() {
                [] => None,
                [single] => Some(Box::new(TermQuery::new(
                    term(single),
                    IndexRecordOption::WithFreqs,
                ))),
                many => Some(Box::new(PhraseQuery::new(
                    many.iter().map(|t| term(t)).collect(),
                ))),
            },
            PlanValue::Required(_) => None,
        }
    }

    /// Collect every matching posting and sum scores per node.
    fn collect(&self, query: &dyn Query) -> Result<Vec<NodeHit>, SearchError> {
        let searcher = self.reader.searcher();
        let num_postings = searcher.num_docs() as usize;
        if num_postings == 0 {
            return Ok(Vec::new());
        }

        let top_docs = searcher.search(query, &TopDocs::with_limit(num_postings))?;
        let mut postings = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            match posting_node_id(&self.schema, &doc) {
                Some(node) => postings.push((node, score as f64)),
                None => warn!(index = %self.name, "Posting without node id"),
            }
        }
        Ok(group_by_node(postings))
    }

    /// Access the underlying Tantivy searcher.
    pub fn searcher(&self) -> Searcher {
        self.reader.searcher()
    }
}

/// Sum posting scores per node, best node first, ties in first-seen order.
pub fn group_by_node(postings: Vec<(NodeId, f64)>) -> Vec<NodeHit> {
    let mut position: HashMap<NodeId, usize> = HashMap::new();
    let mut hits: Vec<NodeHit> = Vec::new();
    for (node, score) in postings {
        match position.get(&node) {
            Some(&i) => hits[i].score += score,
            None => {
                position.insert(node, hits.len());
                hits.push(NodeHit { node, score });
            }
        }
    }
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}
