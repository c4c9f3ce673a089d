//! Distances between instants and shifting instants by calendar units.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{CATEGORY, invalid_date, invalid_time_value, resolve, weekday_index};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{
    MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, date_string, iso_string, millis_between,
    number,
};

const MS_PER_WEEK: f64 = 7.0 * MS_PER_DAY;
const DAYS_PER_MONTH: f64 = 30.44;
const DAYS_PER_YEAR: f64 = 365.25;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "date_difference",
            CATEGORY,
            "Calculate difference between two dates",
            json!({
                "type": "object",
                "properties": {
                    "date1": { "type": "string" },
                    "date2": { "type": "string" }
                },
                "required": ["date1", "date2"]
            }),
            date_difference,
        ),
        ToolDefinition::new(
            "add_time",
            CATEGORY,
            "Add or subtract time from a date",
            json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string" },
                    "amount": { "type": "number" },
                    "unit": {
                        "type": "string",
                        "enum": ["seconds", "minutes", "hours", "days", "weeks", "months", "years"]
                    },
                    "operation": { "type": "string", "enum": ["add", "subtract"], "default": "add" }
                },
                "required": ["date", "amount", "unit"]
            }),
            add_time,
        ),
        ToolDefinition::new(
            "working_days_calculator",
            CATEGORY,
            "Calculate working days between two dates (Mon-Fri)",
            json!({
                "type": "object",
                "properties": {
                    "start_date": { "type": "string" },
                    "end_date": { "type": "string" }
                },
                "required": ["start_date", "end_date"]
            }),
            working_days_calculator,
        ),
        ToolDefinition::new(
            "countdown_to",
            CATEGORY,
            "Create a countdown to a future date",
            json!({
                "type": "object",
                "properties": {
                    "target_date": { "type": "string", "description": "Future date in YYYY-MM-DD format" },
                    "event_name": { "type": "string" }
                },
                "required": ["target_date"]
            }),
            countdown_to,
        ),
    ]
}

// ============================================================================
// date_difference
// ============================================================================

#[derive(Debug, Deserialize)]
struct DifferenceParams {
    date1: String,
    date2: String,
}

fn date_difference(params: DifferenceParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let (Some(d1), Some(d2)) = (resolve(&params.date1, ctx), resolve(&params.date2, ctx)) else {
        return Ok(invalid_date());
    };

    let diff = millis_between(&d1, &d2).abs();
    let total_days = (diff / MS_PER_DAY).floor();
    let earlier = if d1 < d2 { &params.date1 } else { &params.date2 };

    Ok(json!({
        "date1": params.date1,
        "date2": params.date2,
        "total_milliseconds": number(diff),
        "total_seconds": number((diff / MS_PER_SECOND).floor()),
        "total_minutes": number((diff / MS_PER_MINUTE).floor()),
        "total_hours": number((diff / MS_PER_HOUR).floor()),
        "total_days": number(total_days),
        "total_weeks": number((total_days / 7.0).floor()),
        "total_months": number((total_days / DAYS_PER_MONTH).floor()),
        "total_years": number((total_days / DAYS_PER_YEAR).floor()),
        "earlier_date": earlier,
    }))
}

// ============================================================================
// add_time
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    fn label(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Fixed length in milliseconds; calendar units have none.
    fn millis(self) -> Option<f64> {
        match self {
            Self::Seconds => Some(MS_PER_SECOND),
            Self::Minutes => Some(MS_PER_MINUTE),
            Self::Hours => Some(MS_PER_HOUR),
            Self::Days => Some(MS_PER_DAY),
            Self::Weeks => Some(MS_PER_WEEK),
            Self::Months | Self::Years => None,
        }
    }
}

fn default_operation() -> String {
    "add".to_string()
}

#[derive(Debug, Deserialize)]
struct AddTimeParams {
    date: String,
    amount: f64,
    unit: TimeUnit,
    #[serde(default = "default_operation")]
    operation: String,
}

fn add_time(params: AddTimeParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let Some(d) = resolve(&params.date, ctx) else {
        return Ok(invalid_date());
    };
    let sign = if params.operation == "subtract" { -1.0 } else { 1.0 };
    let delta = sign * params.amount;

    let shifted = match params.unit.millis() {
        Some(unit_ms) => shift_millis(&d, delta * unit_ms),
        None if matches!(params.unit, TimeUnit::Years) => shift_months(&d, delta.trunc() * 12.0),
        None => shift_months(&d, delta.trunc()),
    }
    .ok_or_else(invalid_time_value)?;

    Ok(json!({
        "original": params.date,
        "result": iso_string(&shifted),
        "result_formatted": date_string(&shifted),
        "operation": params.operation,
        "amount": number(params.amount),
        "unit": params.unit.label(),
    }))
}

fn shift_millis(d: &DateTime<Utc>, delta: f64) -> Option<DateTime<Utc>> {
    let target = d.timestamp_millis() as f64 + delta.trunc();
    if !target.is_finite() || target.abs() > 8.64e15 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(target as i64)
}

/// Move by whole months keeping day-of-month and time of day. A day past the
/// end of the target month rolls into the next one, so 31 January plus one
/// month lands on 2 or 3 March.
fn shift_months(d: &DateTime<Utc>, months: f64) -> Option<DateTime<Utc>> {
    let index = f64::from(d.year()) * 12.0 + f64::from(d.month0()) + months;
    if !index.is_finite() || index.abs() > 3.0e6 {
        return None;
    }
    let index = index as i64;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month0 = index.rem_euclid(12) as u32;

    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let date = first.checked_add_signed(Duration::days(i64::from(d.day()) - 1))?;
    Some(date.and_time(d.time()).and_utc())
}

// ============================================================================
// working_days_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct WorkingDaysParams {
    start_date: String,
    end_date: String,
}

/// Counts every day from `start_date` stepping by whole days while not past
/// `end_date`.
fn working_days_calculator(params: WorkingDaysParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let (Some(start), Some(end)) = (resolve(&params.start_date, ctx), resolve(&params.end_date, ctx)) else {
        return Ok(invalid_date());
    };

    let span = millis_between(&start, &end);
    let total = if span < 0.0 {
        0
    } else {
        (span / MS_PER_DAY).floor() as u64 + 1
    };

    let first = weekday_index(&start) as u64;
    let remainder_weekdays = (0..total % 7)
        .filter(|i| !matches!((first + i) % 7, 0 | 6))
        .count() as u64;
    let working = total / 7 * 5 + remainder_weekdays;

    Ok(json!({
        "start_date": params.start_date,
        "end_date": params.end_date,
        "working_days": working,
        "weekend_days": total - working,
        "total_days": total,
    }))
}

// ============================================================================
// countdown_to
// ============================================================================

fn default_event_name() -> String {
    "Event".to_string()
}

#[derive(Debug, Deserialize)]
struct CountdownParams {
    target_date: String,
    #[serde(default = "default_event_name")]
    event_name: String,
}

fn countdown_to(params: CountdownParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let Some(target) = resolve(&params.target_date, ctx) else {
        return Ok(invalid_date());
    };

    let diff = millis_between(&ctx.now(), &target);
    if diff < 0.0 {
        return Ok(json!({
            "event_name": params.event_name,
            "target_date": params.target_date,
            "message": "This date has already passed",
            "past": true,
        }));
    }

    let days = (diff / MS_PER_DAY).floor();
    let hours = ((diff % MS_PER_DAY) / MS_PER_HOUR).floor();
    let minutes = ((diff % MS_PER_HOUR) / MS_PER_MINUTE).floor();
    let seconds = ((diff % MS_PER_MINUTE) / MS_PER_SECOND).floor();

    Ok(json!({
        "event_name": params.event_name,
        "target_date": params.target_date,
        "days": number(days),
        "hours": number(hours),
        "minutes": number(minutes),
        "seconds": number(seconds),
        "total_hours": number((diff / MS_PER_HOUR).floor()),
        "summary": format!("{days}d {hours}h {minutes}m {seconds}s"),
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::ok;

    #[test]
    fn test_date_difference() {
        let out = ok(
            "date_difference",
            json!({ "date1": "2024-03-01", "date2": "2024-01-01" }),
        );
        assert_eq!(out["total_days"], 60);
        assert_eq!(out["total_weeks"], 8);
        assert_eq!(out["total_months"], 1);
        assert_eq!(out["total_years"], 0);
        assert_eq!(out["total_hours"], 1440);
        assert_eq!(out["earlier_date"], "2024-01-01");
    }

    #[test]
    fn test_date_difference_invalid_is_soft() {
        let out = ok("date_difference", json!({ "date1": "nope", "date2": "2024-01-01" }));
        assert_eq!(out["error"], "Invalid date");
    }

    #[test]
    fn test_add_fixed_units() {
        let out = ok(
            "add_time",
            json!({ "date": "2024-01-15T10:30:00Z", "amount": 36, "unit": "hours" }),
        );
        assert_eq!(out["result"], "2024-01-16T22:30:00.000Z");
        assert_eq!(out["result_formatted"], "Tue Jan 16 2024");
        assert_eq!(out["operation"], "add");

        let out = ok(
            "add_time",
            json!({ "date": "now", "amount": 2, "unit": "weeks", "operation": "subtract" }),
        );
        assert_eq!(out["result"], "2024-01-01T10:30:00.000Z");
    }

    #[test]
    fn test_add_months_rolls_over_short_months() {
        let out = ok(
            "add_time",
            json!({ "date": "2024-01-31T08:00:00Z", "amount": 1, "unit": "months" }),
        );
        assert_eq!(out["result"], "2024-03-02T08:00:00.000Z");

        let out = ok(
            "add_time",
            json!({ "date": "2024-02-29", "amount": 1, "unit": "years" }),
        );
        assert_eq!(out["result"], "2025-03-01T00:00:00.000Z");

        let out = ok(
            "add_time",
            json!({ "date": "2024-01-15", "amount": 3, "unit": "months", "operation": "subtract" }),
        );
        assert_eq!(out["result"], "2023-10-15T00:00:00.000Z");
    }

    #[test]
    fn test_working_days() {
        // Monday 1 January to Sunday 14 January.
        let out = ok(
            "working_days_calculator",
            json!({ "start_date": "2024-01-01", "end_date": "2024-01-14" }),
        );
        assert_eq!(out["working_days"], 10);
        assert_eq!(out["weekend_days"], 4);
        assert_eq!(out["total_days"], 14);

        // Saturday to Monday.
        let out = ok(
            "working_days_calculator",
            json!({ "start_date": "2024-01-06", "end_date": "2024-01-08" }),
        );
        assert_eq!(out["working_days"], 1);
        assert_eq!(out["weekend_days"], 2);
    }

    #[test]
    fn test_working_days_reversed_range_is_empty() {
        let out = ok(
            "working_days_calculator",
            json!({ "start_date": "2024-02-01", "end_date": "2024-01-01" }),
        );
        assert_eq!(out["total_days"], 0);
        assert_eq!(out["working_days"], 0);
    }

    #[test]
    fn test_countdown() {
        let out = ok(
            "countdown_to",
            json!({ "target_date": "2024-01-17T12:45:30Z", "event_name": "Launch" }),
        );
        assert_eq!(out["days"], 2);
        assert_eq!(out["hours"], 2);
        assert_eq!(out["minutes"], 15);
        assert_eq!(out["seconds"], 30);
        assert_eq!(out["total_hours"], 50);
        assert_eq!(out["summary"], "2d 2h 15m 30s");
    }

    #[test]
    fn test_countdown_past() {
        let out = ok("countdown_to", json!({ "target_date": "2020-01-01" }));
        assert_eq!(out["past"], true);
        assert_eq!(out["event_name"], "Event");
        assert_eq!(out["message"], "This date has already passed");
    }
}
