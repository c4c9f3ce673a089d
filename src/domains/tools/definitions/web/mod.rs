//! Web & Research tools.

mod data;
mod lookup;
mod markup;

pub(crate) use lookup::parse_hex;

use super::super::registry::{Category, ToolDefinition};

const CATEGORY: Category = Category::WebResearch;

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = markup::definitions();
    tools.extend(lookup::definitions());
    tools.extend(data::definitions());
    tools
}
