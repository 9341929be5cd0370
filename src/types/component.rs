//! UI-component catalog entries

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::{require_field, Document, FieldSpec};
use crate::error::SearchResult;

/// A catalog entry describing one UI component
///
/// `name` is the collection's unique key: a later insert under the same name
/// replaces the earlier entry. `props` is a structured value carried through
/// verbatim; it is not indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub props: Value,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub installation: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("name", 3.0),
    FieldSpec::new("description", 1.5),
    FieldSpec::new("category", 1.0),
    FieldSpec::new("usage", 1.0),
    FieldSpec::new("variants", 1.0),
];

impl Document for Component {
    const COLLECTION: &'static str = "components";
    const PREVIEW_FIELD: &'static str = "description";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn field_text(&self, field: &'static str) -> String {
        match field {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "category" => self.category.clone(),
            "usage" => self.usage.clone(),
            "variants" => self.variants.join(" "),
            _ => String::new(),
        }
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn validate(&self) -> SearchResult<()> {
        require_field(Self::COLLECTION, "name", &self.name)?;
        require_field(Self::COLLECTION, "description", &self.description)?;
        Ok(())
    }
}
