//! Developer Tools.

mod generate;
mod inspect;
mod scaffold;

use super::super::registry::{Category, ToolDefinition};

const CATEGORY: Category = Category::DeveloperTools;

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = generate::definitions();
    tools.extend(inspect::definitions());
    tools.extend(scaffold::definitions());
    tools
}
