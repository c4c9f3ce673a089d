//! Utility Toolbox MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing a catalogue of stateless
//! utility tools: text processing, math, web data, dates, business figures,
//! developer helpers and prompt templates.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the JSON-RPC envelope, the
//!   request dispatcher ([`McpServer`]) and the HTTP / STDIO transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the tool registry and every tool definition
//!
//! # Example
//!
//! ```rust,no_run
//! use toolbox_mcp_server::core::{Config, JsonRpcRequest, McpServer};
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let server = McpServer::new(Config::default())?;
//!     let response = server.handle(JsonRpcRequest::new(
//!         1,
//!         "tools/call",
//!         Some(json!({ "name": "word_count", "arguments": { "text": "Hello world" } })),
//!     ));
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
