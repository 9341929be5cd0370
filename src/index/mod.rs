//! Inverted index: term -> postings, plus the corpus statistics the
//! ranker needs
//!
//! One instance per collection. The index holds no document content, only
//! term statistics; it is mutated exclusively by the collection's
//! maintenance operations and stays a pure function of the current
//! document set.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{DocId, Document, FieldSpec};

/// One posting: a term occurrence count within one field of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    /// Index into the collection's field schema
    pub field: usize,
    /// Term frequency within that field
    pub tf: u32,
}

/// Inverted index for one collection
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    schema: &'static [FieldSpec],
    postings: HashMap<String, Vec<Posting>>,
    /// Token count per schema field for every indexed document
    doc_field_lens: HashMap<DocId, Vec<u32>>,
    doc_count: usize,
    /// Sum of field lengths per schema field, for average computation
    total_field_len: Vec<u64>,
}

impl InvertedIndex {
    /// Create an empty index over the given field schema
    pub fn new(schema: &'static [FieldSpec]) -> Self {
        Self {
            schema,
            postings: HashMap::new(),
            doc_field_lens: HashMap::new(),
            doc_count: 0,
            total_field_len: vec![0; schema.len()],
        }
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        self.schema
    }

    /// Number of indexed documents
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.doc_field_lens.contains_key(&doc_id)
    }

    /// Average token length of one schema field across the collection
    pub fn avg_field_len(&self, field: usize) -> f32 {
        if self.doc_count == 0 {
            return 0.0;
        }
        self.total_field_len[field] as f32 / self.doc_count as f32
    }

    /// Token length of one field of one document (0 if unknown)
    pub fn field_len(&self, doc_id: DocId, field: usize) -> u32 {
        self.doc_field_lens
            .get(&doc_id)
            .and_then(|lens| lens.get(field).copied())
            .unwrap_or(0)
    }

    /// Number of distinct documents containing a term in any field
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings
            .get(term)
            .map(|list| {
                list.iter()
                    .map(|p| p.doc_id)
                    .collect::<HashSet<_>>()
                    .len()
            })
            .unwrap_or(0)
    }

    /// Postings for a term, in no particular order
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(|v| v.as_slice())
    }

    /// All indexed terms (test and diagnostics helper)
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(|k| k.as_str())
    }

    /// Union of documents containing at least one of the given terms.
    ///
    /// Returned in ascending id order so downstream iteration is
    /// deterministic.
    pub fn candidates(&self, terms: &[String]) -> BTreeSet<DocId> {
        let mut docs = BTreeSet::new();
        for term in terms {
            if let Some(list) = self.postings.get(term) {
                docs.extend(list.iter().map(|p| p.doc_id));
            }
        }
        docs
    }

    /// Index one document's tokenized fields.
    ///
    /// `field_tokens` must be in schema order. A document already present
    /// is removed first, so re-insertion never double-counts.
    pub fn insert(&mut self, doc_id: DocId, field_tokens: &[Vec<String>]) {
        debug_assert_eq!(field_tokens.len(), self.schema.len());
        if self.contains(doc_id) {
            self.remove(doc_id);
        }

        let mut lens = Vec::with_capacity(self.schema.len());
        for (field, tokens) in field_tokens.iter().enumerate() {
            let mut tf_map: HashMap<&str, u32> = HashMap::new();
            for token in tokens {
                *tf_map.entry(token.as_str()).or_insert(0) += 1;
            }
            for (term, tf) in tf_map {
                self.postings
                    .entry(term.to_string())
                    .or_default()
                    .push(Posting { doc_id, field, tf });
            }

            let len = tokens.len() as u32;
            self.total_field_len[field] += u64::from(len);
            lens.push(len);
        }

        self.doc_field_lens.insert(doc_id, lens);
        self.doc_count += 1;
    }

    /// Remove all postings naming `doc_id` and decrement corpus
    /// statistics. No-op (returns false) if the document is not indexed.
    pub fn remove(&mut self, doc_id: DocId) -> bool {
        let Some(lens) = self.doc_field_lens.remove(&doc_id) else {
            return false;
        };

        self.postings.retain(|_, list| {
            list.retain(|p| p.doc_id != doc_id);
            !list.is_empty()
        });

        for (field, len) in lens.into_iter().enumerate() {
            self.total_field_len[field] -= u64::from(len);
        }
        self.doc_count -= 1;
        true
    }

}

/// Tokenize every schema field of a document, in schema order
pub fn field_tokens<D: Document>(doc: &D) -> Vec<Vec<String>> {
    D::schema()
        .iter()
        .map(|field| crate::text::tokenize(&doc.field_text(field.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, Document};

    fn component(name: &str, description: &str) -> Component {
        Component {
            name: name.to_string(),
            description: description.to_string(),
            category: String::new(),
            props: serde_json::Value::Null,
            usage: String::new(),
            installation: String::new(),
            variants: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    fn index_with(docs: &[(DocId, Component)]) -> InvertedIndex {
        let mut index = InvertedIndex::new(Component::schema());
        for (id, doc) in docs {
            index.insert(*id, &field_tokens(doc));
        }
        index
    }

    #[test]
    fn insert_and_lookup() {
        let index = index_with(&[(1, component("Button", "A clickable button"))]);

        assert_eq!(index.doc_count(), 1);
        assert_eq!(index.doc_freq("button"), 1);
        let candidates = index.candidates(&["button".to_string()]);
        assert!(candidates.contains(&1));
    }

    #[test]
    fn doc_freq_counts_distinct_documents() {
        // "button" appears in two fields of doc 1 and one field of doc 2
        let index = index_with(&[
            (1, component("Button", "the button component")),
            (2, component("IconButton", "button with icon")),
        ]);
        assert_eq!(index.doc_freq("button"), 2);
    }

    #[test]
    fn remove_deletes_postings_and_stats() {
        let mut index = index_with(&[
            (1, component("Button", "clickable")),
            (2, component("Card", "container panel")),
        ]);

        assert!(index.remove(1));
        assert_eq!(index.doc_count(), 1);
        assert_eq!(index.doc_freq("button"), 0);
        assert!(index.candidates(&["button".to_string()]).is_empty());
        // Removing again is a no-op
        assert!(!index.remove(1));
    }

    #[test]
    fn reinsert_replaces_old_content() {
        let mut index = index_with(&[(1, component("Button", "old text"))]);
        index.insert(1, &field_tokens(&component("Button", "new words")));

        assert_eq!(index.doc_count(), 1);
        assert_eq!(index.doc_freq("old"), 0);
        assert_eq!(index.doc_freq("new"), 1);
    }

    #[test]
    fn avg_field_len_tracks_removals() {
        let mut index = index_with(&[
            (1, component("Button", "one two")),
            (2, component("Card", "one two three four")),
        ]);
        // description is schema field 1
        assert!((index.avg_field_len(1) - 3.0).abs() < 0.01);

        index.remove(2);
        assert!((index.avg_field_len(1) - 2.0).abs() < 0.01);
    }

    #[test]
    fn empty_index_has_zero_averages() {
        let index = InvertedIndex::new(Component::schema());
        assert_eq!(index.avg_field_len(0), 0.0);
        assert_eq!(index.doc_count(), 0);
    }
}
