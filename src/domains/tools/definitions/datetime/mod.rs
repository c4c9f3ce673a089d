//! Date & Time tools.
//!
//! All calendar arithmetic happens in UTC. Every date argument also accepts
//! `now`, which reads the call's clock.

mod arithmetic;
mod calendar;
mod format;

use chrono::{DateTime, Datelike, Utc};
use serde_json::{Value, json};

use super::super::context::ToolContext;
use super::super::error::ToolError;
use super::super::registry::{Category, ToolDefinition};
use super::super::support::parse_date;

const CATEGORY: Category = Category::DateTime;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = format::definitions();
    tools.extend(arithmetic::definitions());
    tools.extend(calendar::definitions());
    tools
}

/// Parse a date argument against the call's clock.
fn resolve(input: &str, ctx: &ToolContext) -> Option<DateTime<Utc>> {
    parse_date(input, ctx.now())
}

/// Soft result for an unparsable date argument.
fn invalid_date() -> Value {
    json!({ "error": "Invalid date" })
}

/// Thrown when a computed instant falls outside the representable range.
fn invalid_time_value() -> ToolError {
    ToolError::execution_failed("Invalid time value")
}

/// Sunday-based weekday index, 0..=6.
fn weekday_index(dt: &DateTime<Utc>) -> usize {
    dt.weekday().num_days_from_sunday() as usize
}

fn day_name(dt: &DateTime<Utc>) -> &'static str {
    DAY_NAMES[weekday_index(dt)]
}

fn month_name(dt: &DateTime<Utc>) -> &'static str {
    MONTH_NAMES[dt.month0() as usize]
}
