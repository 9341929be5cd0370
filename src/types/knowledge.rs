//! Question/answer knowledge entries

use serde::{Deserialize, Serialize};

use super::document::{require_field, Document, FieldSpec};
use crate::error::SearchResult;

/// A single Q&A knowledge entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("question", 2.0),
    FieldSpec::new("answer", 1.0),
    FieldSpec::new("category", 1.0),
    FieldSpec::new("tags", 1.5),
];

impl Document for KnowledgeEntry {
    const COLLECTION: &'static str = "knowledge";
    const PREVIEW_FIELD: &'static str = "answer";

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn field_text(&self, field: &'static str) -> String {
        match field {
            "question" => self.question.clone(),
            "answer" => self.answer.clone(),
            "category" => self.category.clone(),
            "tags" => self.tags.join(" "),
            _ => String::new(),
        }
    }

    fn validate(&self) -> SearchResult<()> {
        require_field(Self::COLLECTION, "question", &self.question)?;
        require_field(Self::COLLECTION, "answer", &self.answer)?;
        Ok(())
    }
}
