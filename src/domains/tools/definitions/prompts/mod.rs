//! AI Prompts: fill-in-the-blanks templates for prompts and business writing.
//!
//! These never fail on content; missing optional arguments fall back to
//! placeholder text.

mod assistant;
mod documents;
mod workflow;

use serde_json::{Map, Value};

use super::super::registry::{Category, ToolDefinition};
use super::super::support::display_value;

const CATEGORY: Category = Category::AiPrompts;

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = assistant::definitions();
    tools.extend(documents::definitions());
    tools.extend(workflow::definitions());
    tools
}

/// A field of a loosely-typed entry as template text; absent fields read
/// `undefined`.
fn field_text(entry: &Map<String, Value>, key: &str) -> String {
    entry
        .get(key)
        .map_or_else(|| "undefined".to_string(), display_value)
}

/// `- item` lines.
fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
