//! Rendering instants: formats, Unix time, time zones, week numbers.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{CATEGORY, day_name, invalid_date, invalid_time_value, month_name, resolve, weekday_index};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{
    MS_PER_DAY, MS_PER_MINUTE, MS_PER_SECOND, date_string, display_value, iso_string,
    millis_between, number,
};

/// Largest distance from the epoch, in milliseconds, of a valid instant.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "date_formatter",
            CATEGORY,
            "Format dates in various formats",
            json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "Date string or 'now'" },
                    "format": {
                        "type": "string",
                        "enum": ["iso", "us", "eu", "long", "short", "unix", "relative", "custom"]
                    },
                    "custom_format": { "type": "string", "description": "Custom format like 'DD/MM/YYYY'" }
                },
                "required": ["date", "format"]
            }),
            date_formatter,
        ),
        ToolDefinition::new(
            "timezone_converter",
            CATEGORY,
            "Convert time between timezones",
            json!({
                "type": "object",
                "properties": {
                    "datetime": { "type": "string", "description": "ISO datetime or 'now'" },
                    "from_timezone": { "type": "string", "description": "e.g. America/New_York" },
                    "to_timezone": { "type": "string", "description": "e.g. Asia/Tokyo" }
                },
                "required": ["datetime", "from_timezone", "to_timezone"]
            }),
            timezone_converter,
        ),
        ToolDefinition::new(
            "unix_timestamp",
            CATEGORY,
            "Convert between Unix timestamps and human dates",
            json!({
                "type": "object",
                "properties": {
                    "value": { "type": "string", "description": "Unix timestamp (numbers) or date string" },
                    "to": { "type": "string", "enum": ["timestamp", "date"] }
                },
                "required": ["value", "to"]
            }),
            unix_timestamp,
        ),
        ToolDefinition::new(
            "week_number",
            CATEGORY,
            "Get week number of a date",
            json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "Date string or 'now'" }
                },
                "required": ["date"]
            }),
            week_number,
        ),
    ]
}

// ============================================================================
// date_formatter
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DateFormat {
    Iso,
    Us,
    Eu,
    Long,
    Short,
    Unix,
    Relative,
    Custom,
}

#[derive(Debug, Deserialize)]
struct DateFormatterParams {
    date: String,
    format: DateFormat,
    custom_format: Option<String>,
}

fn date_formatter(params: DateFormatterParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let Some(d) = resolve(&params.date, ctx) else {
        return Ok(invalid_date());
    };

    let (label, formatted) = match params.format {
        DateFormat::Iso => ("iso", iso_string(&d)),
        DateFormat::Us => ("us", format!("{:02}/{:02}/{}", d.month(), d.day(), d.year())),
        DateFormat::Eu => ("eu", format!("{:02}/{:02}/{}", d.day(), d.month(), d.year())),
        DateFormat::Long => (
            "long",
            format!("{}, {} {}, {}", day_name(&d), month_name(&d), d.day(), d.year()),
        ),
        DateFormat::Short => ("short", format!("{} {}, {}", &month_name(&d)[..3], d.day(), d.year())),
        DateFormat::Unix => ("unix", d.timestamp().to_string()),
        DateFormat::Relative => ("relative", relative_phrase(millis_between(&d, &ctx.now()))),
        DateFormat::Custom => (
            "custom",
            match params.custom_format.as_deref() {
                Some(pattern) if !pattern.is_empty() => apply_pattern(pattern, &d),
                _ => iso_string(&d),
            },
        ),
    };

    Ok(json!({
        "input": params.date,
        "formatted": formatted,
        "format": label,
        "day_of_week": day_name(&d),
        "timezone": "UTC",
    }))
}

/// Describe a signed distance from now; positive means in the past.
fn relative_phrase(diff_ms: f64) -> String {
    if diff_ms.abs() < MS_PER_MINUTE {
        return "just now".to_string();
    }
    let direction = if diff_ms > 0.0 { "ago" } else { "from now" };
    let minutes = diff_ms.abs() / MS_PER_MINUTE;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    if days > 365.0 {
        format!("{} years {direction}", (days / 365.0).floor())
    } else if days > 30.0 {
        format!("{} months {direction}", (days / 30.0).floor())
    } else if days > 1.0 {
        format!("{} days {direction}", days.floor())
    } else if hours > 1.0 {
        format!("{} hours {direction}", hours.floor())
    } else {
        format!("{} minutes {direction}", minutes.floor())
    }
}

/// Substitute the first occurrence of each token, in the order
/// `YYYY MM DD HH mm ss`.
fn apply_pattern(pattern: &str, d: &DateTime<Utc>) -> String {
    [
        ("YYYY", d.year().to_string()),
        ("MM", format!("{:02}", d.month())),
        ("DD", format!("{:02}", d.day())),
        ("HH", format!("{:02}", d.hour())),
        ("mm", format!("{:02}", d.minute())),
        ("ss", format!("{:02}", d.second())),
    ]
    .iter()
    .fold(pattern.to_string(), |acc, (token, value)| acc.replacen(token, value, 1))
}

// ============================================================================
// timezone_converter
// ============================================================================

#[derive(Debug, Deserialize)]
struct TimezoneParams {
    datetime: String,
    from_timezone: String,
    to_timezone: String,
}

/// Input without an explicit offset is taken as UTC; the zones only affect
/// how the instant is displayed.
fn timezone_converter(params: TimezoneParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let zones = (params.from_timezone.parse::<Tz>(), params.to_timezone.parse::<Tz>());
    let (Ok(from), Ok(to)) = zones else {
        return Ok(json!({
            "error": r#"Invalid timezone. Use IANA format like "America/New_York", "Europe/London", "Asia/Tokyo""#
        }));
    };
    let Some(d) = resolve(&params.datetime, ctx) else {
        return Ok(invalid_date());
    };

    Ok(json!({
        "original": params.datetime,
        "from_timezone": params.from_timezone,
        "to_timezone": params.to_timezone,
        "from_time": full_local(&d, from),
        "to_time": full_local(&d, to),
        "utc": iso_string(&d),
    }))
}

/// `Monday, January 15, 2024 at 5:30:00 AM EST`
fn full_local(d: &DateTime<Utc>, zone: Tz) -> String {
    zone.from_utc_datetime(&d.naive_utc())
        .format("%A, %B %-d, %Y at %-I:%M:%S %p %Z")
        .to_string()
}

// ============================================================================
// unix_timestamp
// ============================================================================

#[derive(Debug, Deserialize)]
struct UnixParams {
    value: Value,
    to: String,
}

/// `to` other than `timestamp` reads `value` as seconds since the epoch.
fn unix_timestamp(params: UnixParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = display_value(&params.value);

    if params.to == "timestamp" {
        let Some(d) = resolve(&text, ctx) else {
            return Ok(invalid_date());
        };
        let millis = d.timestamp_millis();
        return Ok(json!({
            "input": params.value,
            "unix_timestamp": millis.div_euclid(1000),
            "unix_ms": millis,
        }));
    }

    let seconds = parse_number(&text);
    let millis = (seconds * MS_PER_SECOND).trunc();
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return Err(invalid_time_value());
    }
    let d = DateTime::<Utc>::from_timestamp_millis(millis as i64).ok_or_else(invalid_time_value)?;

    Ok(json!({
        "input": params.value,
        "date": iso_string(&d),
        "formatted": date_string(&d),
        "time": d.format("%H:%M:%S GMT+0000 (Coordinated Universal Time)").to_string(),
    }))
}

/// Whole-string numeric conversion: blank is zero, anything else must parse.
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

// ============================================================================
// week_number
// ============================================================================

#[derive(Debug, Deserialize)]
struct WeekParams {
    date: String,
}

/// Week numbers count from the week containing 1 January, weeks starting on
/// Sunday.
fn week_number(params: WeekParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let Some(d) = resolve(&params.date, ctx) else {
        return Ok(invalid_date());
    };
    let Some(start_of_year) = Utc.with_ymd_and_hms(d.year(), 1, 1, 0, 0, 0).single() else {
        return Err(invalid_time_value());
    };

    let days_elapsed = millis_between(&start_of_year, &d) / MS_PER_DAY;
    let week = ((days_elapsed + weekday_index(&start_of_year) as f64 + 1.0) / 7.0).ceil();

    Ok(json!({
        "date": date_string(&d),
        "week_number": number(week),
        "year": d.year(),
        "day_of_year": number(days_elapsed.floor() + 1.0),
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{ok, run};

    #[test]
    fn test_date_formats() {
        let format = |f: &str| {
            ok("date_formatter", json!({ "date": "2024-03-05T14:07:09Z", "format": f }))["formatted"].clone()
        };
        assert_eq!(format("iso"), "2024-03-05T14:07:09.000Z");
        assert_eq!(format("us"), "03/05/2024");
        assert_eq!(format("eu"), "05/03/2024");
        assert_eq!(format("long"), "Tuesday, March 5, 2024");
        assert_eq!(format("short"), "Mar 5, 2024");
        assert_eq!(format("unix"), "1709647629");
        assert_eq!(format("custom"), "2024-03-05T14:07:09.000Z");
    }

    #[test]
    fn test_custom_pattern_replaces_first_occurrence() {
        let out = ok(
            "date_formatter",
            json!({ "date": "2024-03-05T14:07:09Z", "format": "custom", "custom_format": "DD/MM/YYYY HH:mm:ss DD" }),
        );
        assert_eq!(out["formatted"], "05/03/2024 14:07:09 DD");
        assert_eq!(out["day_of_week"], "Tuesday");
        assert_eq!(out["timezone"], "UTC");
    }

    #[test]
    fn test_relative_uses_clock() {
        let relative = |date: &str| {
            ok("date_formatter", json!({ "date": date, "format": "relative" }))["formatted"].clone()
        };
        assert_eq!(relative("now"), "just now");
        assert_eq!(relative("2024-01-12T10:30:00Z"), "3 days ago");
        assert_eq!(relative("2024-01-15T13:30:00Z"), "3 hours from now");
        assert_eq!(relative("2022-01-01"), "2 years ago");
    }

    #[test]
    fn test_invalid_date_is_soft() {
        let out = ok("date_formatter", json!({ "date": "not a date", "format": "iso" }));
        assert_eq!(out["error"], "Invalid date");
    }

    #[test]
    fn test_timezone_conversion() {
        let out = ok(
            "timezone_converter",
            json!({
                "datetime": "2024-01-15T10:30:00Z",
                "from_timezone": "America/New_York",
                "to_timezone": "Asia/Tokyo"
            }),
        );
        assert_eq!(out["from_time"], "Monday, January 15, 2024 at 5:30:00 AM EST");
        assert_eq!(out["to_time"], "Monday, January 15, 2024 at 7:30:00 PM JST");
        assert_eq!(out["utc"], "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn test_unknown_timezone_is_soft() {
        let out = ok(
            "timezone_converter",
            json!({ "datetime": "now", "from_timezone": "Mars/Olympus", "to_timezone": "UTC" }),
        );
        assert!(out["error"].as_str().unwrap().starts_with("Invalid timezone"));
    }

    #[test]
    fn test_unix_timestamp_both_ways() {
        let out = ok("unix_timestamp", json!({ "value": "now", "to": "timestamp" }));
        assert_eq!(out["unix_timestamp"], 1_705_314_600);
        assert_eq!(out["unix_ms"], 1_705_314_600_000i64);

        let out = ok("unix_timestamp", json!({ "value": "1705314600", "to": "date" }));
        assert_eq!(out["date"], "2024-01-15T10:30:00.000Z");
        assert_eq!(out["formatted"], "Mon Jan 15 2024");
        assert_eq!(out["time"], "10:30:00 GMT+0000 (Coordinated Universal Time)");
    }

    #[test]
    fn test_unix_timestamp_bad_number_is_thrown() {
        let err = run("unix_timestamp", json!({ "value": "soon", "to": "date" })).unwrap_err();
        assert!(err.to_string().contains("Invalid time value"));
    }

    #[test]
    fn test_week_number() {
        let out = ok("week_number", json!({ "date": "2024-01-15" }));
        // 1 January 2024 was a Monday.
        assert_eq!(out["week_number"], 3);
        assert_eq!(out["day_of_year"], 15);
        assert_eq!(out["date"], "Mon Jan 15 2024");

        let out = ok("week_number", json!({ "date": "2023-01-01" }));
        assert_eq!(out["week_number"], 1);
    }
}
