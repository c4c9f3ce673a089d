//! Business & Finance tools.
//!
//! Money amounts are rounded to cents. Ratios that cannot be computed come
//! out as `null`, or as an `"N/A"` string where a tool says so.

mod ledger;
mod metrics;
mod planning;

use super::super::registry::{Category, ToolDefinition};
use super::super::support::{fmt_number, round_half_up};

const CATEGORY: Category = Category::BusinessFinance;

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = ledger::definitions();
    tools.extend(metrics::definitions());
    tools.extend(planning::definitions());
    tools
}

/// A ratio as a percentage with two decimals.
fn ratio_percent(ratio: f64) -> f64 {
    round_half_up(ratio * 10_000.0) / 100.0
}

/// `12.5%`
fn percent_label(percent: f64) -> String {
    format!("{}%", fmt_number(percent))
}
