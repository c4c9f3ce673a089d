//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! The STDIO transport is served by rmcp, which dispatches through a
//! [`ToolRouter`]. Every registry entry becomes one dynamic route that calls
//! back into the shared [`ToolRegistry`], so both transports run the same
//! handlers and render results the same way.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, ErrorCode, JsonObject, Tool},
};
use serde_json::Value;

use super::error::ToolError;
use super::registry::{ToolDefinition, ToolRegistry, render_result};
use crate::core::protocol::{EXECUTION_ERROR, METHOD_NOT_FOUND};

/// Build the tool router with every registered tool.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .iter()
        .fold(ToolRouter::new(), |router, definition| {
            router.with_route(create_route(registry.clone(), definition))
        })
}

/// rmcp tool metadata for a definition.
pub fn to_tool(definition: &ToolDefinition) -> Tool {
    let input_schema: JsonObject = match &definition.input_schema {
        Value::Object(schema) => schema.clone(),
        _ => JsonObject::new(),
    };
    Tool {
        name: definition.name.into(),
        description: Some(definition.listed_description().into()),
        input_schema: Arc::new(input_schema),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Map a thrown tool error onto the protocol error a client sees.
pub fn to_mcp_error(err: ToolError) -> McpError {
    let code = match err {
        ToolError::NotFound(_) => METHOD_NOT_FOUND,
        _ => EXECUTION_ERROR,
    };
    McpError::new(ErrorCode(code), err.to_string(), None)
}

fn create_route<S>(registry: Arc<ToolRegistry>, definition: &ToolDefinition) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = definition.name;
    ToolRoute::new_dyn(to_tool(definition), move |ctx: ToolCallContext<'_, S>| {
        let arguments = ctx.arguments.clone().map(Value::Object).unwrap_or(Value::Null);
        let registry = registry.clone();
        async move {
            let value = registry.call(name, arguments).map_err(to_mcp_error)?;
            Ok(CallToolResult::success(vec![Content::text(render_result(&value))]))
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolEnvironment;

    struct TestServer {}

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::builtin(ToolEnvironment::system()).unwrap())
    }

    #[test]
    fn test_build_router() {
        let registry = registry();
        let router: ToolRouter<TestServer> = build_tool_router(registry.clone());
        let tools = router.list_all();
        assert_eq!(tools.len(), registry.len());

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"word_count"));
        assert!(names.contains(&"calculator"));
        assert!(names.contains(&"press_release_template"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = registry();
        let router: ToolRouter<TestServer> = build_tool_router(registry.clone());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        for name in registry.names() {
            assert!(router_names.contains(&name), "missing route for {name}");
        }
    }

    #[test]
    fn test_tool_metadata_carries_category_prefix() {
        let registry = registry();
        let definition = registry.get("word_count").unwrap();
        let tool = to_tool(definition);
        assert_eq!(
            tool.description.as_deref(),
            Some("[Text & Content] Count words, characters, sentences, and paragraphs in text")
        );
        assert_eq!(tool.input_schema.get("type"), Some(&Value::from("object")));
    }

    #[test]
    fn test_error_mapping() {
        let err = to_mcp_error(ToolError::invalid_arguments("missing field `text`"));
        assert_eq!(err.code, ErrorCode(EXECUTION_ERROR));
        assert!(err.message.contains("missing field `text`"));

        let err = to_mcp_error(ToolError::not_found("nope"));
        assert_eq!(err.code, ErrorCode(METHOD_NOT_FOUND));
        assert_eq!(err.message, "Unknown tool: nope");
    }
}
