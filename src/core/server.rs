//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the tool registry and is the request dispatcher: the
//! HTTP transport feeds it decoded JSON-RPC requests through
//! [`McpServer::handle`], and the STDIO transport drives it as an rmcp
//! `ServerHandler` whose tool router calls into the same registry.
//!
//! ## Dispatch
//!
//! | method       | result                                                |
//! |--------------|-------------------------------------------------------|
//! | `initialize` | protocol version, `{tools:{}}` capability, server info |
//! | `tools/list` | one entry per registered tool                         |
//! | `tools/call` | a single text content block holding the JSON result   |
//! | other        | `-32601 Unknown method`                               |

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result as ServerResult;
use super::protocol::{EXECUTION_ERROR, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PROTOCOL_VERSION};
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router, render_result};

const INSTRUCTIONS: &str = "Stateless utility tools for text, math, web data, dates, \
    business figures, developer chores and prompt templates. Call tools/list for the catalog.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Every invocable tool, shared read-only by all requests.
    registry: Arc<ToolRegistry>,

    /// Tool router for rmcp-driven transports.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server holding every built-in tool.
    pub fn new(config: Config) -> ServerResult<Self> {
        let registry = ToolRegistry::builtin(config.tools.environment())?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server around an already-built registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    // ========================================================================
    // Request Dispatcher
    // ========================================================================

    /// Answer one JSON-RPC request.
    ///
    /// Never fails: unknown methods, unknown tools and failing handlers all
    /// come back as an error envelope carrying the request's `id`.
    #[instrument(skip_all, fields(method = %request.method))]
    pub fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            method => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::method_not_found(request.id, method)
            }
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Processing initialize request");
        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": self.name(),
                    "version": self.version()
                }
            }),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Processing tools/list request");
        JsonRpcResponse::success(request.id, json!({ "tools": self.registry.listings() }))
    }

    fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let Some(name) = request.param_str("name").map(str::to_string) else {
            return JsonRpcResponse::invalid_params(request.id, "missing tool name");
        };
        let arguments = request.param("arguments").cloned().unwrap_or_else(|| json!({}));
        info!("Processing tools/call request: {}", name);

        match self.registry.call(&name, arguments) {
            Ok(result) => JsonRpcResponse::success(
                request.id,
                json!({ "content": [{ "type": "text", "text": render_result(&result) }] }),
            ),
            Err(err @ ToolError::NotFound(_)) => {
                JsonRpcResponse::error(request.id, METHOD_NOT_FOUND, err.to_string())
            }
            Err(err) => JsonRpcResponse::error(request.id, EXECUTION_ERROR, err.to_string()),
        }
    }

    // ========================================================================
    // Auxiliary documents
    // ========================================================================

    /// Health probe body.
    pub fn health(&self) -> Value {
        json!({
            "status": "healthy",
            "server": self.name(),
            "version": self.version(),
            "timestamp": self.registry.environment().now().to_rfc3339(),
            "tools_available": self.registry.len(),
            "categories": self.registry.categories(),
        })
    }

    /// Tool catalog grouped by category.
    pub fn catalog(&self) -> Value {
        json!({
            "server": self.name(),
            "version": self.version(),
            "total_tools": self.registry.len(),
            "categories": self.registry.catalog(),
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{FixedClock, ToolEnvironment};
    use chrono::{TimeZone, Utc};

    fn server() -> McpServer {
        let env = ToolEnvironment::system()
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()))
            .with_seed(Some(1));
        McpServer::with_registry(Config::default(), ToolRegistry::builtin(env).unwrap())
    }

    fn call(server: &McpServer, id: Value, name: &str, arguments: Value) -> JsonRpcResponse {
        server.handle(JsonRpcRequest::new(
            id,
            "tools/call",
            Some(json!({ "name": name, "arguments": arguments })),
        ))
    }

    fn text_result(response: &JsonRpcResponse) -> Value {
        let result = response.result.as_ref().expect("success");
        let content = result["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap()
    }

    #[test]
    fn test_initialize() {
        let response = server().handle(JsonRpcRequest::new(0, "initialize", None));
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["capabilities"], json!({ "tools": {} }));
        assert_eq!(result["serverInfo"]["name"], "Utility Toolbox MCP Server");
        assert_eq!(response.id, json!(0));
    }

    #[test]
    fn test_tools_list_matches_registry() {
        let server = server();
        let response = server.handle(JsonRpcRequest::new("list", "tools/list", None));
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), server.registry().len());
        assert_eq!(tools[0]["name"], "summarize_text");
        assert!(tools[0]["description"].as_str().unwrap().starts_with("[Text & Content] "));
    }

    #[test]
    fn test_word_count_end_to_end() {
        let response = call(&server(), json!(1), "word_count", json!({ "text": "Hello world" }));
        assert_eq!(response.id, json!(1));
        let result = text_result(&response);
        assert_eq!(result["characters"], 11);
        assert_eq!(result["words"], 2);
        assert_eq!(result["sentences"], 0);
        assert_eq!(result["paragraphs"], 1);
    }

    #[test]
    fn test_text_matches_direct_call() {
        let server = server();
        let arguments = json!({ "numbers": [1, 2, 3, 4] });
        let direct = server.registry().call("statistics_calculator", arguments.clone()).unwrap();
        let response = call(&server, json!(5), "statistics_calculator", arguments);
        assert_eq!(text_result(&response), direct);
    }

    #[test]
    fn test_unknown_tool() {
        let response = server().handle(JsonRpcRequest::new(
            2,
            "tools/call",
            Some(json!({ "name": "nonexistent_tool" })),
        ));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": { "code": -32601, "message": "Unknown tool: nonexistent_tool" }
            })
        );
    }

    #[test]
    fn test_unknown_method() {
        let response = server().handle(JsonRpcRequest::new(Value::Null, "resources/list", None));
        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.message, "Unknown method: resources/list");
        assert!(response.result.is_none());
        assert_eq!(response.id, Value::Null);
    }

    #[test]
    fn test_missing_tool_name() {
        let response = server().handle(JsonRpcRequest::new(3, "tools/call", None));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_thrown_handler_error() {
        let response = call(&server(), json!(4), "word_count", json!({}));
        let error = response.error.unwrap();
        assert_eq!(error.code, EXECUTION_ERROR);
        assert!(error.message.contains("text"));
    }

    #[test]
    fn test_soft_error_is_a_result() {
        let response = call(&server(), json!(6), "parse_json", json!({ "json_string": "{oops" }));
        let result = text_result(&response);
        assert_eq!(result["valid"], false);
        assert!(result["error"].is_string());
    }

    #[test]
    fn test_null_arguments_become_empty_object() {
        let response = call(&server(), json!(7), "generate_uuid", Value::Null);
        assert_eq!(text_result(&response)["count"], 1);
    }

    #[test]
    fn test_health_and_catalog() {
        let server = server();
        let health = server.health();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["tools_available"], 90);
        assert_eq!(health["timestamp"], "2024-01-15T10:30:00+00:00");
        assert_eq!(health["categories"].as_array().unwrap().len(), 7);

        let catalog = server.catalog();
        assert_eq!(catalog["total_tools"], 90);
        assert_eq!(catalog["categories"][6]["category"], "AI Prompts");
        assert_eq!(catalog["categories"][6]["count"], 10);
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "Utility Toolbox MCP Server");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_new_serves_every_tool_over_rmcp() {
        let server: ServerResult<McpServer> = McpServer::new(Config::default());
        let server = server.unwrap();
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), server.registry().len());
    }
}
