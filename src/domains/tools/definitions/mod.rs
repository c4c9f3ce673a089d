//! Tool definitions module.
//!
//! One submodule per catalog category. Each exposes `definitions()`, the
//! category's tools in listing order.

mod business;
mod datetime;
mod developer;
mod math;
mod prompts;
mod text;
mod web;

use super::registry::ToolDefinition;

/// Every built-in tool, grouped by category in catalog order.
pub fn all() -> Vec<ToolDefinition> {
    let mut tools = text::definitions();
    tools.extend(math::definitions());
    tools.extend(web::definitions());
    tools.extend(datetime::definitions());
    tools.extend(business::definitions());
    tools.extend(developer::definitions());
    tools.extend(prompts::definitions());
    tools
}
