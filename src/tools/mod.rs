//! MCP tool implementations over the registry

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::SearchError;
use crate::protocol::{McpTool, Tool};
use crate::registry::Registry;
use crate::server::McpServer;
use crate::types::{McpResult, SearchResponse};

/// Register every tool on the server
pub fn register_all_tools(server: &mut McpServer, registry: Arc<Registry>) {
    server
        .register_tool(Box::new(SearchKnowledgeTool { registry: registry.clone() }))
        .register_tool(Box::new(SearchExamplesTool { registry: registry.clone() }))
        .register_tool(Box::new(SearchComponentsTool { registry: registry.clone() }))
        .register_tool(Box::new(GetComponentTool { registry: registry.clone() }))
        .register_tool(Box::new(ListComponentsTool { registry }));
}

fn search_input_schema(query_desc: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": query_desc
            },
            "limit": {
                "type": "integer",
                "description": "Maximum number of results to return (default 5)"
            }
        },
        "required": ["query"]
    })
}

fn require_query(params: &Value) -> McpResult<&str> {
    params
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing required parameter: query".into())
}

/// Limits below 1 fall back to the default
fn read_limit(params: &Value) -> Option<usize> {
    params
        .get("limit")
        .and_then(|v| v.as_i64())
        .filter(|&n| n >= 1)
        .map(|n| n as usize)
}

fn response_value(response: SearchResponse) -> McpResult<Value> {
    Ok(serde_json::to_value(response)?)
}

/// Full-text search over the knowledge base
pub struct SearchKnowledgeTool {
    registry: Arc<Registry>,
}

impl Tool for SearchKnowledgeTool {
    fn definition(&self) -> McpTool {
        McpTool {
            name: "search_knowledge".to_string(),
            description: "Search the UI development knowledge base for questions and answers \
                          about components, theming, and best practices"
                .to_string(),
            input_schema: search_input_schema("Search query, e.g. 'how to customize theme colors'"),
        }
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let query = require_query(&params)?;
        let response = self.registry.search_knowledge(query, read_limit(&params))?;
        response_value(response)
    }
}

/// Full-text search over code examples
pub struct SearchExamplesTool {
    registry: Arc<Registry>,
}

impl Tool for SearchExamplesTool {
    fn definition(&self) -> McpTool {
        McpTool {
            name: "search_examples".to_string(),
            description: "Search runnable code examples by component, feature, or technique"
                .to_string(),
            input_schema: search_input_schema("Search query, e.g. 'form validation'"),
        }
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let query = require_query(&params)?;
        let response = self.registry.search_examples(query, read_limit(&params))?;
        response_value(response)
    }
}

/// Full-text search over the component catalog
pub struct SearchComponentsTool {
    registry: Arc<Registry>,
}

impl Tool for SearchComponentsTool {
    fn definition(&self) -> McpTool {
        McpTool {
            name: "search_components".to_string(),
            description: "Search the component catalog by name, description, or category"
                .to_string(),
            input_schema: search_input_schema("Search query, e.g. 'dropdown'"),
        }
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let query = require_query(&params)?;
        let response = self.registry.search_components(query, read_limit(&params))?;
        response_value(response)
    }
}

/// Exact component lookup by name
pub struct GetComponentTool {
    registry: Arc<Registry>,
}

impl Tool for GetComponentTool {
    fn definition(&self) -> McpTool {
        McpTool {
            name: "get_component".to_string(),
            description: "Get full details for one component by its exact name \
                          (case-insensitive)"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Component name, e.g. 'Button'"
                    }
                },
                "required": ["name"]
            }),
        }
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or("missing required parameter: name")?;

        let component = self
            .registry
            .get_component(name)
            .ok_or_else(|| SearchError::NotFound(format!("component '{name}'")))?;
        Ok(serde_json::to_value(component)?)
    }
}

/// Catalog listing: every component's name, category, and description
pub struct ListComponentsTool {
    registry: Arc<Registry>,
}

impl Tool for ListComponentsTool {
    fn definition(&self) -> McpTool {
        McpTool {
            name: "list_components".to_string(),
            description: "List every component in the catalog with its category".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    fn execute(&self, _params: Value) -> McpResult<Value> {
        let components = self.registry.list_components();
        let summaries: Vec<Value> = components
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "category": c.category,
                    "description": c.description
                })
            })
            .collect();

        Ok(json!({
            "total": summaries.len(),
            "components": summaries
        }))
    }
}
