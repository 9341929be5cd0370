//! Data types for the UIKit MCP Server
//!
//! One typed struct per collection, plus the `Document` trait the index and
//! search engine are written against.

mod component;
mod document;
mod example;
mod knowledge;
mod results;

pub use component::Component;
pub use document::{Document, FieldSpec};
pub use example::{CodeExample, Complexity};
pub use knowledge::KnowledgeEntry;
pub use results::{LoadReport, SearchHit, SearchResponse};

/// Stable document identity assigned by the primary store at creation
pub type DocId = u32;

/// Result type for MCP protocol and tool operations
pub type McpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
