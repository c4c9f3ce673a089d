//! Data & Math tools.

mod calculator;
mod convert;
mod everyday;
mod series;

use super::super::registry::{Category, ToolDefinition};

const CATEGORY: Category = Category::DataMath;

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = calculator::definitions();
    tools.extend(convert::definitions());
    tools.extend(series::definitions());
    tools.extend(everyday::definitions());
    tools
}
