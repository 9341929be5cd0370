//! Primary store and index maintenance
//!
//! A `Collection<D>` owns one collection's documents, its inverted index,
//! and the on-disk snapshot + journal pair. Every mutation touches the
//! store and the index under one write lock, so readers never observe a
//! document present in one but absent or stale in the other.

mod atomic;
mod journal;

pub use journal::{Journal, JournalOp};

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::index::{field_tokens, InvertedIndex};
use crate::search::search_collection;
use crate::types::{DocId, Document, LoadReport, SearchResponse};

/// First snapshot line: the generation this snapshot belongs to.
///
/// Journal entries are stamped with the same generation; a crash between a
/// bulk load's snapshot rename and its journal truncation leaves stale
/// entries behind, and the generation mismatch keeps them from replaying.
#[derive(Serialize, Deserialize)]
struct SnapshotHeader {
    generation: u64,
}

/// One snapshot line: a document with its stable id
#[derive(Serialize, Deserialize)]
struct SnapshotRecord<D> {
    id: DocId,
    doc: D,
}

/// In-memory state guarded by the collection lock
struct State<D: Document> {
    docs: BTreeMap<DocId, D>,
    /// Unique-key lookup for collections that enforce one
    by_key: HashMap<String, DocId>,
    next_id: DocId,
    generation: u64,
    index: InvertedIndex,
}

impl<D: Document> State<D> {
    fn empty() -> Self {
        Self {
            docs: BTreeMap::new(),
            by_key: HashMap::new(),
            next_id: 1,
            generation: 0,
            index: InvertedIndex::new(D::schema()),
        }
    }

    /// Apply an insert to store and index together. In-memory only;
    /// cannot fail once the document has validated.
    fn apply_insert(&mut self, id: DocId, doc: D) {
        if let Some(key) = doc.unique_key() {
            self.by_key.insert(key.to_lowercase(), id);
        }
        self.index.insert(id, &field_tokens(&doc));
        self.docs.insert(id, doc);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    /// Remove a document from store and index. Returns the removed
    /// document, or None if the id was absent.
    fn apply_delete(&mut self, id: DocId) -> Option<D> {
        let doc = self.docs.remove(&id)?;
        if let Some(key) = doc.unique_key() {
            self.by_key.remove(&key.to_lowercase());
        }
        self.index.remove(id);
        Some(doc)
    }

    fn existing_id_for_key(&self, doc: &D) -> Option<DocId> {
        doc.unique_key()
            .and_then(|key| self.by_key.get(&key.to_lowercase()).copied())
    }
}

/// A document collection: primary store, inverted index, and persistence
pub struct Collection<D: Document> {
    snapshot_path: PathBuf,
    journal: Journal,
    state: RwLock<State<D>>,
}

impl<D: Document> Collection<D> {
    /// Open (or create) the collection under `data_dir`, replaying the
    /// snapshot and journal and rebuilding the index from the recovered
    /// document set.
    pub fn open(data_dir: &Path) -> SearchResult<Self> {
        fs::create_dir_all(data_dir)?;
        atomic::cleanup_temp_files(data_dir)?;

        let snapshot_path = data_dir.join(format!("{}.jsonl", D::COLLECTION));
        let journal = Journal::new(data_dir.join(format!("{}.journal.jsonl", D::COLLECTION)));

        let mut state = State::empty();
        if snapshot_path.exists() {
            let content = fs::read_to_string(&snapshot_path)?;
            for (line_num, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                if line_num == 0 {
                    if let Ok(header) = serde_json::from_str::<SnapshotHeader>(line) {
                        state.generation = header.generation;
                        continue;
                    }
                }
                match serde_json::from_str::<SnapshotRecord<D>>(line) {
                    Ok(record) => state.apply_insert(record.id, record.doc),
                    Err(e) => {
                        tracing::warn!(
                            collection = D::COLLECTION,
                            line = line_num + 1,
                            error = %e,
                            "skipping unparseable snapshot record"
                        );
                    }
                }
            }
        }

        for op in journal.replay::<D>(state.generation)? {
            match op {
                JournalOp::Insert { id, doc } | JournalOp::Update { id, doc } => {
                    state.apply_delete(id);
                    state.apply_insert(id, doc);
                }
                JournalOp::Delete { id } => {
                    state.apply_delete(id);
                }
            }
        }

        tracing::debug!(
            collection = D::COLLECTION,
            documents = state.docs.len(),
            "collection opened"
        );

        Ok(Self {
            snapshot_path,
            journal,
            state: RwLock::new(state),
        })
    }

    /// Insert a new document.
    ///
    /// Fails with a validation error if required fields are missing, or if
    /// the collection enforces a unique key and the key collides (use
    /// [`Collection::upsert`] for replace-on-collision semantics).
    pub fn insert(&self, doc: D) -> SearchResult<DocId> {
        doc.validate()?;
        let mut state = self.state.write();

        if let Some(existing) = state.existing_id_for_key(&doc) {
            return Err(SearchError::Validation(format!(
                "{}: unique key {:?} already held by document {existing}",
                D::COLLECTION,
                doc.unique_key().unwrap_or_default()
            )));
        }

        let id = state.next_id;
        self.journal
            .append(&JournalOp::Insert { id, doc: doc.clone() }, state.generation)?;
        state.apply_insert(id, doc);
        Ok(id)
    }

    /// Insert, replacing any existing document under the same unique key.
    /// The replaced document keeps its id.
    pub fn upsert(&self, doc: D) -> SearchResult<DocId> {
        doc.validate()?;
        let mut state = self.state.write();

        let id = match state.existing_id_for_key(&doc) {
            Some(existing) => {
                self.journal.append(
                    &JournalOp::Update { id: existing, doc: doc.clone() },
                    state.generation,
                )?;
                state.apply_delete(existing);
                existing
            }
            None => {
                let id = state.next_id;
                self.journal
                    .append(&JournalOp::Insert { id, doc: doc.clone() }, state.generation)?;
                id
            }
        };
        state.apply_insert(id, doc);
        Ok(id)
    }

    /// Replace the document under `id`: a delete plus insert applied as
    /// one atomic unit under the write lock. Returns false (no-op) if the
    /// id is unknown.
    pub fn update(&self, id: DocId, doc: D) -> SearchResult<bool> {
        doc.validate()?;
        let mut state = self.state.write();

        if !state.docs.contains_key(&id) {
            return Ok(false);
        }
        self.journal
            .append(&JournalOp::Update { id, doc: doc.clone() }, state.generation)?;
        state.apply_delete(id);
        state.apply_insert(id, doc);
        Ok(true)
    }

    /// Remove a document and all its postings. Returns false (no-op) if
    /// the id is unknown.
    pub fn delete(&self, id: DocId) -> SearchResult<bool> {
        let mut state = self.state.write();

        if !state.docs.contains_key(&id) {
            return Ok(false);
        }
        self.journal.append::<D>(&JournalOp::Delete { id }, state.generation)?;
        state.apply_delete(id);
        Ok(true)
    }

    /// Bulk-load a document batch.
    ///
    /// With `force_clear` false this only populates an empty collection;
    /// against a populated one it is a no-op reporting the existing count.
    /// With `force_clear` true the collection (store and index together)
    /// is cleared and repopulated. All-or-nothing: any document failing
    /// validation aborts the whole batch, leaving the prior state intact.
    pub fn bulk_load(&self, docs: Vec<D>, force_clear: bool) -> SearchResult<LoadReport> {
        let mut state = self.state.write();

        if !force_clear && !state.docs.is_empty() {
            return Ok(LoadReport { inserted: 0, total: state.docs.len() });
        }

        // Stage the full replacement state before touching anything
        // readers can see; a validation failure here leaves the
        // collection untouched. The staged state opens a new generation,
        // so journal entries from the superseded one are dead even if the
        // truncation below never happens.
        let mut staged = State::empty();
        staged.generation = state.generation + 1;
        let mut inserted = 0usize;
        for doc in docs {
            doc.validate()?;
            match staged.existing_id_for_key(&doc) {
                Some(existing) => {
                    // Later entries replace earlier ones under the same key
                    staged.apply_delete(existing);
                    staged.apply_insert(existing, doc);
                }
                None => {
                    let id = staged.next_id;
                    staged.apply_insert(id, doc);
                    inserted += 1;
                }
            }
        }

        self.write_snapshot(&staged)?;
        self.journal.truncate()?;
        let total = staged.docs.len();
        *state = staged;

        Ok(LoadReport { inserted, total })
    }

    /// Relevance-ranked search over this collection
    pub fn search(&self, query: &str, limit: Option<usize>) -> SearchResult<SearchResponse> {
        let state = self.state.read();
        search_collection(&state.docs, &state.index, query, limit)
    }

    pub fn len(&self) -> usize {
        self.state.read().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().docs.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<D> {
        self.state.read().docs.get(&id).cloned()
    }

    /// Lookup by unique key (case-insensitive); None for collections
    /// without a key or unknown keys
    pub fn get_by_key(&self, key: &str) -> Option<D> {
        let state = self.state.read();
        let id = state.by_key.get(&key.to_lowercase())?;
        state.docs.get(id).cloned()
    }

    /// All documents with their ids, in id order
    pub fn documents(&self) -> Vec<(DocId, D)> {
        self.state
            .read()
            .docs
            .iter()
            .map(|(id, doc)| (*id, doc.clone()))
            .collect()
    }

    /// Build a fresh index from the current document set.
    ///
    /// The maintained index must always be equivalent to this rebuild
    /// (same postings per term, allowing reordering); exposed so tests can
    /// assert that invariant.
    pub fn rebuilt_index(&self) -> InvertedIndex {
        let state = self.state.read();
        let mut index = InvertedIndex::new(D::schema());
        for (id, doc) in &state.docs {
            index.insert(*id, &field_tokens(doc));
        }
        index
    }

    /// Run a closure against the live index snapshot (test helper)
    pub fn with_index<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> R {
        let state = self.state.read();
        f(&state.index)
    }

    fn write_snapshot(&self, state: &State<D>) -> SearchResult<()> {
        let header = SnapshotHeader { generation: state.generation };
        let mut content = serde_json::to_string(&header)?;
        content.push('\n');
        for (id, doc) in &state.docs {
            let record = SnapshotRecord { id: *id, doc: doc.clone() };
            content.push_str(&serde_json::to_string(&record)?);
            content.push('\n');
        }
        atomic::atomic_write(&self.snapshot_path, &content)?;
        Ok(())
    }
}
