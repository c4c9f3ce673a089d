//! Text & Content tools.

mod analysis;
mod extract;
mod generate;
mod transform;

use super::super::registry::{Category, ToolDefinition};

const CATEGORY: Category = Category::TextContent;

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(analysis::definitions());
    tools.extend(extract::definitions());
    tools.extend(transform::definitions());
    tools.extend(generate::definitions());
    tools
}
