//! uikit-mcp: an embedded full-text search engine for UI development
//! documentation, exposed as an MCP server over stdio.
//!
//! Three collections are maintained: a knowledge base of questions and
//! answers, a library of code examples, and a component catalog. Each is
//! backed by a JSONL snapshot plus a write-ahead journal and searched
//! through an incrementally maintained inverted index with BM25 ranking.

pub mod error;
pub mod index;
pub mod protocol;
pub mod registry;
pub mod search;
pub mod server;
pub mod store;
pub mod text;
pub mod tools;
pub mod types;

pub use error::{SearchError, SearchResult};
pub use protocol::{ServerInfo, Tool};
pub use registry::Registry;
pub use server::McpServer;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
