//! Search responses and load reports

use serde::Serialize;
use serde_json::Value;

/// One ranked search result: all original document fields flattened,
/// plus the relevance score and a highlighted snippet
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: Value,
    pub relevance_score: f32,
    pub snippet: String,
}

/// Response of one search call
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    /// Total candidates matched before truncation to the limit
    pub total: usize,
    pub query: String,
    pub search_time_ms: f64,
}

impl SearchResponse {
    /// Empty response for blank queries
    pub fn empty(query: &str, elapsed_ms: f64) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            query: query.to_string(),
            search_time_ms: elapsed_ms,
        }
    }
}

/// Outcome of a bulk load against one collection
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LoadReport {
    /// Documents inserted by this call (0 for a non-forced no-op)
    pub inserted: usize,
    /// Documents in the collection after the call
    pub total: usize,
}
