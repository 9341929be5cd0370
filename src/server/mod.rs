//! MCP server: JSON-RPC 2.0 over stdio
//!
//! Reads one request per line from stdin and writes one response per line
//! to stdout. All logging goes to stderr; stdout carries only protocol
//! frames.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use serde_json::{json, Value};

use crate::protocol::{error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpTool, ServerInfo, Tool};
use crate::types::McpResult;

/// MCP protocol revision implemented by this server
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Stdio MCP server with a registry of named tools
pub struct McpServer {
    server_info: ServerInfo,
    tools: HashMap<String, Box<dyn Tool>>,
    reader: BufReader<io::Stdin>,
    writer: BufWriter<io::Stdout>,
}

impl McpServer {
    pub fn new(info: ServerInfo) -> Self {
        Self {
            server_info: info,
            tools: HashMap::new(),
            reader: BufReader::new(io::stdin()),
            writer: BufWriter::new(io::stdout()),
        }
    }

    /// Register a tool under its definition name
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name(), tool);
        self
    }

    /// Serve requests until stdin closes
    pub fn run(&mut self) -> McpResult<()> {
        tracing::info!(tools = self.tools.len(), "server ready");
        let mut line = String::new();
        while self.reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                self.handle_request(trimmed)?;
            }
            line.clear();
        }
        Ok(())
    }

    fn handle_request(&mut self, request_str: &str) -> McpResult<()> {
        let request: JsonRpcRequest = match serde_json::from_str(request_str) {
            Ok(req) => req,
            Err(e) => {
                return self.send_error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    "Parse error",
                    Some(json!({"details": e.to_string()})),
                );
            }
        };

        if request.jsonrpc != "2.0" {
            return self.send_error(
                request.id.unwrap_or(Value::Null),
                error_codes::INVALID_REQUEST,
                "Invalid Request",
                Some(json!({"details": "jsonrpc must be '2.0'"})),
            );
        }

        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "notifications/initialized" => Ok(()), // Notification, no response
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params),
            "ping" => self.send_result(id, json!({})),
            _ => self.send_error(
                id,
                error_codes::METHOD_NOT_FOUND,
                "Method not found",
                Some(json!({"method": request.method})),
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> McpResult<()> {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            }
        });
        self.send_result(id, result)
    }

    fn handle_tools_list(&mut self, id: Value) -> McpResult<()> {
        let tools: Vec<McpTool> = self.tools.values().map(|t| t.definition()).collect();
        self.send_result(id, json!({ "tools": tools }))
    }

    fn handle_tool_call(&mut self, id: Value, params: Option<Value>) -> McpResult<()> {
        let Some(params) = params else {
            return self.send_error(
                id,
                error_codes::INVALID_PARAMS,
                "Invalid params",
                Some(json!({"details": "missing parameters"})),
            );
        };
        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return self.send_error(
                id,
                error_codes::INVALID_PARAMS,
                "Invalid params",
                Some(json!({"details": "missing tool name"})),
            );
        };

        let Some(tool) = self.tools.get(tool_name) else {
            return self.send_error(
                id,
                error_codes::INVALID_PARAMS,
                "Unknown tool",
                Some(json!({"tool": tool_name})),
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        match tool.execute(arguments) {
            Ok(result) => self.send_result(id, result),
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "tool execution failed");
                self.send_error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    "Tool execution error",
                    Some(json!({"details": e.to_string()})),
                )
            }
        }
    }

    fn send_result(&mut self, id: Value, result: Value) -> McpResult<()> {
        let response = JsonRpcResponse::new(id, result);
        writeln!(self.writer, "{}", serde_json::to_string(&response)?)?;
        self.writer.flush()?;
        Ok(())
    }

    fn send_error(
        &mut self,
        id: Value,
        code: i32,
        message: &str,
        data: Option<Value>,
    ) -> McpResult<()> {
        let response = JsonRpcError::new(id, code, message, data);
        writeln!(self.writer, "{}", serde_json::to_string(&response)?)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(ServerInfo::default())
    }
}
