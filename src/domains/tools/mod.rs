//! Tools domain module.
//!
//! Tools are stateless utility functions that MCP clients call by name. Each
//! one is a [`ToolDefinition`]: a name, a category, an advisory input schema
//! and a handler over a typed parameter struct.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one directory per category
//! - `registry.rs` - Central tool registry and dispatch, shared by every transport
//! - `router.rs` - rmcp ToolRouter built from the registry for STDIO
//! - `context.rs` - Clock and RNG handed to each call
//! - `support.rs` - Number, text and date helpers shared by the definitions
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Write the params struct and handler in the category's submodule
//! 2. Add a `ToolDefinition::new(...)` entry to that submodule's `definitions()`
//!
//! The registry, the HTTP catalog and the STDIO router all pick it up.

mod context;
mod definitions;
mod error;
mod registry;
pub mod router;
mod support;

#[cfg(test)]
mod testing;

pub use context::{Clock, FixedClock, SystemClock, ToolContext, ToolEnvironment};
pub use error::{ToolError, ToolResult};
pub use registry::{Category, CategoryListing, ToolDefinition, ToolRegistry, render_result};
pub use router::build_tool_router;
