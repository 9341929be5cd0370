//! The registry: three independent document collections and the seed-data
//! lifecycle that populates them

mod ingest;

pub use ingest::read_seed_file;

use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SearchResult;
use crate::store::Collection;
use crate::types::{
    CodeExample, Component, Document, KnowledgeEntry, LoadReport, SearchResponse,
};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "UIKIT_DATA_DIR";

/// Per-collection outcome of one seed sync
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SyncReport {
    pub knowledge: LoadReport,
    pub examples: LoadReport,
    pub components: LoadReport,
}

/// The three collections plus their on-disk layout:
/// `<data_dir>/store/` for snapshots and journals,
/// `<data_dir>/seeds/` for ingestion sources.
pub struct Registry {
    data_dir: PathBuf,
    pub knowledge: Collection<KnowledgeEntry>,
    pub examples: Collection<CodeExample>,
    pub components: Collection<Component>,
}

impl Registry {
    /// Open all three collections under the given data directory
    pub fn open(data_dir: impl Into<PathBuf>) -> SearchResult<Self> {
        let data_dir = data_dir.into();
        let store_dir = data_dir.join("store");

        Ok(Self {
            knowledge: Collection::open(&store_dir)?,
            examples: Collection::open(&store_dir)?,
            components: Collection::open(&store_dir)?,
            data_dir,
        })
    }

    /// Resolve the data directory: explicit argument, then the
    /// `UIKIT_DATA_DIR` environment variable, then `./data`. Relative
    /// paths resolve against the current directory.
    pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let chosen = explicit
            .or_else(|| env::var(DATA_DIR_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("data"));

        if chosen.is_absolute() {
            chosen
        } else {
            current_dir.join(chosen)
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn seed_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join("seeds").join(format!("{collection}.jsonl"))
    }

    /// Load seed data into every collection.
    ///
    /// Without `force`, populated collections are left untouched and
    /// report their existing counts. With `force`, each collection with a
    /// present seed file is cleared and repopulated in one transaction.
    pub fn sync_seed_data(&self, force: bool) -> SearchResult<SyncReport> {
        let report = SyncReport {
            knowledge: self.sync_collection(&self.knowledge, force)?,
            examples: self.sync_collection(&self.examples, force)?,
            components: self.sync_collection(&self.components, force)?,
        };

        tracing::info!(
            knowledge = report.knowledge.total,
            examples = report.examples.total,
            components = report.components.total,
            forced = force,
            "seed sync complete"
        );
        Ok(report)
    }

    fn sync_collection<D: Document>(
        &self,
        collection: &Collection<D>,
        force: bool,
    ) -> SearchResult<LoadReport> {
        let seed_path = self.seed_path(D::COLLECTION);
        if !seed_path.exists() {
            // Nothing to load; report current state
            return Ok(LoadReport { inserted: 0, total: collection.len() });
        }

        let docs = read_seed_file::<D>(&seed_path)?;
        let report = collection.bulk_load(docs, force)?;
        tracing::info!(
            collection = D::COLLECTION,
            inserted = report.inserted,
            total = report.total,
            "collection synced"
        );
        Ok(report)
    }

    pub fn search_knowledge(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> SearchResult<SearchResponse> {
        self.knowledge.search(query, limit)
    }

    pub fn search_examples(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> SearchResult<SearchResponse> {
        self.examples.search(query, limit)
    }

    pub fn search_components(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> SearchResult<SearchResponse> {
        self.components.search(query, limit)
    }

    /// Exact lookup of one component by its unique name
    pub fn get_component(&self, name: &str) -> Option<Component> {
        self.components.get_by_key(name)
    }

    /// All component names and categories, in insertion order
    pub fn list_components(&self) -> Vec<Component> {
        self.components
            .documents()
            .into_iter()
            .map(|(_, doc)| doc)
            .collect()
    }
}
