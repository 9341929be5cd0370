//! Code example entries

use serde::{Deserialize, Serialize};

use super::document::{require_field, Document, FieldSpec};
use crate::error::SearchResult;

/// Difficulty rating of a code example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Basic
    }
}

/// A runnable code example tied to a component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExample {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub component: String,
    pub code: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("title", 2.0),
    FieldSpec::new("description", 1.5),
    FieldSpec::new("component", 1.5),
    FieldSpec::new("tags", 1.5),
    FieldSpec::new("category", 1.0),
    FieldSpec::new("code", 0.5),
];

impl Document for CodeExample {
    const COLLECTION: &'static str = "examples";
    const PREVIEW_FIELD: &'static str = "description";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn field_text(&self, field: &'static str) -> String {
        match field {
            "title" => self.title.clone(),
            "description" => self.description.clone(),
            "component" => self.component.clone(),
            "tags" => self.tags.join(" "),
            "category" => self.category.clone(),
            "code" => self.code.clone(),
            _ => String::new(),
        }
    }

    fn validate(&self) -> SearchResult<()> {
        require_field(Self::COLLECTION, "title", &self.title)?;
        require_field(Self::COLLECTION, "code", &self.code)?;
        Ok(())
    }
}
