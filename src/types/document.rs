//! The `Document` trait: what the index and search engine need to know
//! about a collection's records

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{SearchError, SearchResult};

/// An indexed field with its fixed relative ranking weight
///
/// Weights are domain-tuned constants supplied with each collection schema;
/// the only property the ranker relies on is that a higher weight yields a
/// higher contribution, all else being equal.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub weight: f32,
}

impl FieldSpec {
    pub const fn new(name: &'static str, weight: f32) -> Self {
        Self { name, weight }
    }
}

/// A record belonging to exactly one collection
///
/// Implementors expose a fixed field schema; the inverted index and the
/// ranker are written against this surface and stay collection-agnostic.
pub trait Document:
    Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Collection name, used for store paths and log context
    const COLLECTION: &'static str;

    /// Field whose text is excerpted into result snippets
    const PREVIEW_FIELD: &'static str;

    /// Indexed fields in schema order, with ranking weights
    fn schema() -> &'static [FieldSpec];

    /// Raw text of one schema field; list-valued fields join their
    /// elements with spaces
    fn field_text(&self, field: &'static str) -> String;

    /// Unique key for collections that enforce one (upsert semantics);
    /// `None` for collections without a key
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Structural validation applied before any index mutation
    fn validate(&self) -> SearchResult<()>;
}

/// Shared helper: reject an empty required field
pub(crate) fn require_field(
    collection: &str,
    field: &str,
    value: &str,
) -> SearchResult<()> {
    if value.trim().is_empty() {
        return Err(SearchError::Validation(format!(
            "{collection}: required field '{field}' is empty"
        )));
    }
    Ok(())
}
