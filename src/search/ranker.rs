//! BM25 relevance scoring with per-field weighting
//!
//! Pure functions over the index's read-only statistics snapshot; safe to
//! call concurrently from any number of readers. Scores order results
//! within one query only and carry no cross-query meaning.

use rayon::prelude::*;

use crate::index::InvertedIndex;
use crate::types::DocId;

/// BM25 term-frequency saturation
pub const K1: f32 = 1.2;
/// BM25 length-normalization strength
pub const B: f32 = 0.75;

/// Candidate count above which scoring runs in parallel
const PARALLEL_SCORE_THRESHOLD: usize = 1000;

/// Smoothed inverse document frequency:
/// `ln((N - df + 0.5) / (df + 0.5) + 1)`
pub fn idf(index: &InvertedIndex, term: &str) -> f32 {
    let n = index.doc_count() as f32;
    let df = index.doc_freq(term) as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Score one document against the expanded term set.
///
/// Per matching term and field: saturating tf, inverse document frequency,
/// and field-length normalization against the collection average, summed
/// with the schema's fixed field weights.
pub fn score_doc(index: &InvertedIndex, doc_id: DocId, terms: &[String]) -> f32 {
    let schema = index.schema();
    let mut score = 0.0f32;

    for term in terms {
        let Some(postings) = index.postings(term) else {
            continue;
        };
        let idf = idf(index, term);
        for posting in postings.iter().filter(|p| p.doc_id == doc_id) {
            let tf = posting.tf as f32;
            let len = index.field_len(doc_id, posting.field) as f32;
            let avg = index.avg_field_len(posting.field);
            let norm = if avg > 0.0 { 1.0 - B + B * len / avg } else { 1.0 };
            let contribution = idf * (tf * (K1 + 1.0)) / (tf + K1 * norm);
            score += schema[posting.field].weight * contribution;
        }
    }

    score
}

/// Score every candidate and order descending by score, ascending by
/// document id on ties, so result ordering is deterministic across runs.
pub fn rank(
    index: &InvertedIndex,
    candidates: &[DocId],
    terms: &[String],
) -> Vec<(DocId, f32)> {
    let mut scored: Vec<(DocId, f32)> = if candidates.len() > PARALLEL_SCORE_THRESHOLD {
        candidates
            .par_iter()
            .map(|&id| (id, score_doc(index, id, terms)))
            .collect()
    } else {
        candidates
            .iter()
            .map(|&id| (id, score_doc(index, id, terms)))
            .collect()
    };

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::field_tokens;
    use crate::types::{Document, KnowledgeEntry};

    fn entry(question: &str, answer: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            category: String::new(),
            tags: Vec::new(),
        }
    }

    fn build_index(docs: &[(u32, KnowledgeEntry)]) -> InvertedIndex {
        let mut index = InvertedIndex::new(KnowledgeEntry::schema());
        for (id, doc) in docs {
            index.insert(*id, &field_tokens(doc));
        }
        index
    }

    #[test]
    fn rare_terms_outweigh_common_terms() {
        let mut docs = Vec::new();
        for i in 0..10u32 {
            let text = if i == 0 { "styling with tokens" } else { "styling basics" };
            docs.push((i, entry("how to style", text)));
        }
        let index = build_index(&docs);

        let idf_common = idf(&index, "style");
        let idf_rare = idf(&index, "token");
        assert!(idf_rare > idf_common);
    }

    #[test]
    fn higher_weighted_field_scores_higher() {
        // Same term, once in the question (weight 2.0), once in the answer
        let index = build_index(&[
            (1, entry("theming guide", "general styling notes")),
            (2, entry("general styling notes", "theming guide")),
        ]);
        let terms = vec!["theme".to_string()];

        let in_question = score_doc(&index, 1, &terms);
        let in_answer = score_doc(&index, 2, &terms);
        assert!(in_question > in_answer);
    }

    #[test]
    fn repeated_terms_saturate() {
        let index = build_index(&[
            (1, entry("q", "grid")),
            (2, entry("q", "grid grid grid grid grid grid grid grid")),
        ]);
        let terms = vec!["grid".to_string()];

        let single = score_doc(&index, 1, &terms);
        let stuffed = score_doc(&index, 2, &terms);
        // Stuffing gains a little but nowhere near 8x; saturation plus
        // length normalization keeps it bounded
        assert!(stuffed < single * 3.0);
    }

    #[test]
    fn equal_scores_order_by_doc_id() {
        let index = build_index(&[
            (7, entry("identical", "identical")),
            (3, entry("identical", "identical")),
        ]);
        let terms = vec!["ident".to_string()];

        let ranked = rank(&index, &[7, 3], &terms);
        assert_eq!(ranked[0].0, 3);
        assert_eq!(ranked[1].0, 7);
        assert!((ranked[0].1 - ranked[1].1).abs() < f32::EPSILON);
    }

    #[test]
    fn unmatched_candidate_scores_zero() {
        let index = build_index(&[(1, entry("modal dialogs", "how to open"))]);
        let score = score_doc(&index, 1, &["carousel".to_string()]);
        assert_eq!(score, 0.0);
    }
}
