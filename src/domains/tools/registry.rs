//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The [`ToolDefinition`] record every tool is described by
//! - A registry of all available tools, built once at start-up
//! - Dispatch of tool calls with a fresh [`ToolContext`] per call
//! - Tool metadata for listing and the per-category catalog

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::context::{ToolContext, ToolEnvironment};
use super::definitions;
use super::error::{ToolError, ToolResult};

// ============================================================================
// Tool Definition
// ============================================================================

/// Uniform handler signature every tool is adapted to.
pub type ToolHandler = Box<dyn Fn(Value, &mut ToolContext) -> ToolResult<Value> + Send + Sync>;

/// Tool categories, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Text & Content")]
    TextContent,
    #[serde(rename = "Data & Math")]
    DataMath,
    #[serde(rename = "Web & Research")]
    WebResearch,
    #[serde(rename = "Date & Time")]
    DateTime,
    #[serde(rename = "Business & Finance")]
    BusinessFinance,
    #[serde(rename = "Developer Tools")]
    DeveloperTools,
    #[serde(rename = "AI Prompts")]
    AiPrompts,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::TextContent,
        Category::DataMath,
        Category::WebResearch,
        Category::DateTime,
        Category::BusinessFinance,
        Category::DeveloperTools,
        Category::AiPrompts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::TextContent => "Text & Content",
            Category::DataMath => "Data & Math",
            Category::WebResearch => "Web & Research",
            Category::DateTime => "Date & Time",
            Category::BusinessFinance => "Business & Finance",
            Category::DeveloperTools => "Developer Tools",
            Category::AiPrompts => "AI Prompts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named, schema-described tool.
pub struct ToolDefinition {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    /// Advisory JSON schema; arguments are not validated against it.
    pub input_schema: Value,
    handler: ToolHandler,
}

impl ToolDefinition {
    /// Define a tool from a handler over a typed parameter struct.
    ///
    /// The argument mapping is deserialized into `P` before the handler runs;
    /// a missing required field or a mistyped value fails the call with
    /// [`ToolError::InvalidArguments`].
    pub fn new<P, F>(
        name: &'static str,
        category: Category,
        description: &'static str,
        input_schema: Value,
        handler: F,
    ) -> Self
    where
        P: DeserializeOwned,
        F: Fn(P, &mut ToolContext) -> ToolResult<Value> + Send + Sync + 'static,
    {
        Self {
            name,
            category,
            description,
            input_schema,
            handler: Box::new(move |arguments, ctx| {
                let arguments = match arguments {
                    Value::Null => json!({}),
                    other => other,
                };
                let params: P = serde_json::from_value(arguments)?;
                handler(params, ctx)
            }),
        }
    }

    /// Description as shown to clients, prefixed with the category.
    pub fn listed_description(&self) -> String {
        format!("[{}] {}", self.category, self.description)
    }

    /// `{name, description, inputSchema}` entry for `tools/list`.
    pub fn listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.listed_description(),
            "inputSchema": self.input_schema,
        })
    }

    /// Run the handler directly.
    pub fn invoke(&self, arguments: Value, ctx: &mut ToolContext) -> ToolResult<Value> {
        (self.handler)(arguments, ctx)
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// One catalog group: a category and the names of its tools.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub category: Category,
    pub count: usize,
    pub tools: Vec<&'static str>,
}

/// Render a tool result as the text payload of a content block.
pub fn render_result(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Built once and shared read-only; lookups are exact name matches.
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<&'static str, usize>,
    env: ToolEnvironment,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new(env: ToolEnvironment) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            env,
        }
    }

    /// Create a registry holding every built-in tool.
    pub fn builtin(env: ToolEnvironment) -> ToolResult<Self> {
        let mut registry = Self::new(env);
        for definition in definitions::all() {
            registry.register(definition)?;
        }
        debug!("Registered {} tools", registry.len());
        Ok(registry)
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, definition: ToolDefinition) -> ToolResult<()> {
        if self.index.contains_key(definition.name) {
            return Err(ToolError::AlreadyRegistered(definition.name.to_string()));
        }
        self.index.insert(definition.name, self.tools.len());
        self.tools.push(definition);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn environment(&self) -> &ToolEnvironment {
        &self.env
    }

    /// Entries for `tools/list`.
    pub fn listings(&self) -> Vec<Value> {
        self.tools.iter().map(ToolDefinition::listing).collect()
    }

    /// Tools grouped by category, in catalog order, empty groups omitted.
    pub fn catalog(&self) -> Vec<CategoryListing> {
        Category::ALL
            .iter()
            .map(|&category| {
                let tools: Vec<&'static str> = self
                    .tools
                    .iter()
                    .filter(|t| t.category == category)
                    .map(|t| t.name)
                    .collect();
                CategoryListing {
                    category,
                    count: tools.len(),
                    tools,
                }
            })
            .filter(|listing| listing.count > 0)
            .collect()
    }

    /// Categories that hold at least one tool.
    pub fn categories(&self) -> Vec<Category> {
        self.catalog().into_iter().map(|l| l.category).collect()
    }

    /// Invoke a tool by exact name.
    ///
    /// A panicking handler is reported as [`ToolError::ExecutionFailed`].
    #[instrument(skip(self, arguments))]
    pub fn call(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let Some(tool) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        debug!("Calling tool");
        let mut ctx = self.env.context();
        match panic::catch_unwind(AssertUnwindSafe(|| tool.invoke(arguments, &mut ctx))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("Tool failed: {}", e);
                Err(e)
            }
            Err(_) => {
                warn!("Tool panicked");
                Err(ToolError::execution_failed(format!("tool '{name}' panicked")))
            }
        }
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.len())
            .field("env", &self.env)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashSet;
    use tokio_test::{assert_err, assert_ok};

    fn builtin() -> ToolRegistry {
        ToolRegistry::builtin(ToolEnvironment::system().with_seed(Some(42))).unwrap()
    }

    #[derive(Deserialize)]
    struct EchoParams {
        text: String,
    }

    fn echo(params: EchoParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
        Ok(json!({ "text": params.text }))
    }

    #[test]
    fn test_builtin_tool_count() {
        assert_eq!(builtin().len(), 90);
    }

    #[test]
    fn test_names_are_unique() {
        let registry = builtin();
        let names = registry.names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_catalog_counts() {
        let catalog = builtin().catalog();
        let counts: Vec<(&str, usize)> = catalog
            .iter()
            .map(|l| (l.category.label(), l.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("Text & Content", 20),
                ("Data & Math", 15),
                ("Web & Research", 12),
                ("Date & Time", 10),
                ("Business & Finance", 12),
                ("Developer Tools", 11),
                ("AI Prompts", 10),
            ]
        );
    }

    #[test]
    fn test_listing_prefix() {
        let registry = builtin();
        for (tool, listing) in registry.iter().zip(registry.listings()) {
            let description = listing["description"].as_str().unwrap();
            assert!(description.starts_with(&format!("[{}] ", tool.category)));
            assert_eq!(listing["name"], tool.name);
            assert_eq!(listing["inputSchema"]["type"], "object");
        }
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let mut registry = ToolRegistry::new(ToolEnvironment::system());
        let make = || ToolDefinition::new("echo", Category::TextContent, "Echo", json!({"type": "object"}), echo);
        assert_ok!(registry.register(make()));
        let err = assert_err!(registry.register(make()));
        assert!(matches!(err, ToolError::AlreadyRegistered(name) if name == "echo"));
    }

    #[test]
    fn test_call_unknown() {
        let err = builtin().call("unknown", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[test]
    fn test_call_missing_argument_is_thrown() {
        let err = builtin().call("word_count", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_call_null_arguments_use_defaults() {
        let result = builtin().call("generate_uuid", Value::Null).unwrap();
        assert_eq!(result["count"], 1);
    }

    #[test]
    fn test_panicking_handler_is_contained() {
        fn explode(_params: EchoParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
            panic!("boom")
        }
        let mut registry = ToolRegistry::new(ToolEnvironment::system());
        registry
            .register(ToolDefinition::new("explode", Category::DeveloperTools, "Panics", json!({"type": "object"}), explode))
            .unwrap();
        let err = assert_err!(registry.call("explode", json!({"text": "x"})));
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }

    #[test]
    fn test_render_result_is_pretty() {
        let text = render_result(&json!({"a": 1}));
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }
}
