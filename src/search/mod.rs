//! Search orchestration: expand -> tokenize -> index lookup -> rank ->
//! snippet -> limited, ordered result set with timing metadata

pub mod ranker;
pub mod snippet;

use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::{SearchError, SearchResult};
use crate::index::InvertedIndex;
use crate::text::{expand_query, tokenize};
use crate::types::{DocId, Document, SearchHit, SearchResponse};

/// Result-set size when the caller passes no usable limit
pub const DEFAULT_LIMIT: usize = 5;

/// Upper bound on raw query length; anything longer is structurally
/// rejected before reaching the index layer
pub const MAX_QUERY_LEN: usize = 1024;

/// Run one search over a collection's documents and index.
///
/// The caller holds the collection read lock, so the index and document
/// map form a consistent snapshot. An empty query (after trimming) is not
/// an error; it yields an empty result set.
pub fn search_collection<D: Document>(
    docs: &BTreeMap<DocId, D>,
    index: &InvertedIndex,
    query: &str,
    limit: Option<usize>,
) -> SearchResult<SearchResponse> {
    let start = Instant::now();

    // Blank queries are answered before the length bound applies; only a
    // query with actual content can be structurally invalid
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Ok(SearchResponse::empty(query, elapsed_ms(start)));
    }
    if trimmed.len() > MAX_QUERY_LEN {
        return Err(SearchError::Query(format!(
            "query exceeds {MAX_QUERY_LEN} bytes"
        )));
    }

    // Synonym expansion first (raw words, used again for highlighting),
    // then the same tokenizer that built the index
    let expanded_words = expand_query(trimmed);
    let mut terms: Vec<String> = Vec::new();
    for word in &expanded_words {
        for term in tokenize(word) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
    }
    if terms.is_empty() {
        return Ok(SearchResponse::empty(query, elapsed_ms(start)));
    }

    // Highlighting must catch stem-only matches ("buttons" matching a
    // field that says "button"), so the raw expanded words and the
    // stemmed index terms both participate
    let mut highlight_terms = expanded_words.clone();
    for term in &terms {
        if !highlight_terms.contains(term) {
            highlight_terms.push(term.clone());
        }
    }

    let candidates: Vec<DocId> = index.candidates(&terms).into_iter().collect();
    let ranked = ranker::rank(index, &candidates, &terms);
    let total = ranked.len();

    let limit = limit.filter(|&l| l >= 1).unwrap_or(DEFAULT_LIMIT);
    let mut results = Vec::with_capacity(limit.min(total));
    for (doc_id, score) in ranked.into_iter().take(limit) {
        let doc = docs.get(&doc_id).ok_or_else(|| {
            SearchError::IndexInconsistency(format!(
                "{}: indexed document {doc_id} missing from primary store",
                D::COLLECTION
            ))
        })?;
        let preview = doc.field_text(D::PREVIEW_FIELD);
        results.push(SearchHit {
            document: serde_json::to_value(doc)?,
            relevance_score: score,
            snippet: snippet::make_snippet(
                &preview,
                &highlight_terms,
                snippet::DEFAULT_WINDOW,
            ),
        });
    }

    Ok(SearchResponse {
        results,
        total,
        query: query.to_string(),
        search_time_ms: elapsed_ms(start),
    })
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
