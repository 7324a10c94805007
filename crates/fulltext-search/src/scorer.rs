//! Final relevance scores.
//!
//! Fuzzy matches keep the engine's native score. Exact matches are scored
//! by how much of a property value the literal covers: `1 / L`, where `L`
//! is the character length of the shortest property value containing the
//! literal. Shorter containing values score higher.

use tracing::debug;

use fulltext_types::{NodeId, PropertyMap};

use crate::planner::{MatchMode, QueryPlan};

/// Score for an exact literal against a node's properties.
///
/// Containment is checked case-sensitively first, then ignoring case.
/// `None` if no value contains the literal.
pub fn exact_score(properties: &PropertyMap, literal: &str) -> Option<f64> {
    let texts: Vec<String> = properties.values().map(|v| v.to_index_text()).collect();

    let shortest = |matches: &dyn Fn(&str) -> bool| {
        texts
            .iter()
            .filter(|text| !text.is_empty() && matches(text.as_str()))
            .map(|text| text.chars().count())
            .min()
    };

    let length = shortest(&|text: &str| text.contains(literal)).or_else(|| {
        let needle = literal.to_lowercase();
        shortest(&|text: &str| text.to_lowercase().contains(&needle))
    })?;

    Some(1.0 / length as f64)
}

/// Final score of one hit under `plan`.
///
/// `None` drops the hit: an exact phrase matched on tokens, but no
/// property value contains the literal itself (e.g. `New-York`).
pub fn score_hit(
    plan: &QueryPlan,
    node: NodeId,
    native: f64,
    properties: &PropertyMap,
) -> Option<f64> {
    match (plan.mode, plan.exact_literal()) {
        (MatchMode::Exact, Some(literal)) => {
            let score = exact_score(properties, literal);
            if score.is_none() {
                debug!(node_id = %node, literal, "No property contains the exact literal");
            }
            score
        }
        _ => Some(native),
    }
}
