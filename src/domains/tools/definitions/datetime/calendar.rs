//! Month grids and US federal holidays.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{CATEGORY, DAY_NAMES, MONTH_NAMES, invalid_date, resolve, weekday_index};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::number;

/// Holidays on a fixed month and day.
const FIXED_HOLIDAYS: [(u32, u32, &str); 5] = [
    (1, 1, "New Year's Day"),
    (7, 4, "Independence Day"),
    (12, 25, "Christmas Day"),
    (11, 11, "Veterans Day"),
    (6, 19, "Juneteenth"),
];

/// Holidays on the nth weekday of a month: (month, weekday from Sunday,
/// first day, last day, name).
const WEEKDAY_HOLIDAYS: [(u32, usize, u32, u32, &str); 4] = [
    (1, 1, 15, 21, "MLK Jr. Day"),
    (5, 1, 25, 31, "Memorial Day"),
    (9, 1, 1, 7, "Labor Day"),
    (11, 4, 22, 28, "Thanksgiving Day"),
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "calendar_generator",
            CATEGORY,
            "Generate a text calendar for any month",
            json!({
                "type": "object",
                "properties": {
                    "year": { "type": "number" },
                    "month": { "type": "number", "description": "1-12" }
                },
                "required": ["year", "month"]
            }),
            calendar_generator,
        ),
        ToolDefinition::new(
            "is_holiday",
            CATEGORY,
            "Check if a date is a US Federal holiday",
            json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "YYYY-MM-DD" }
                },
                "required": ["date"]
            }),
            is_holiday,
        ),
    ]
}

// ============================================================================
// calendar_generator
// ============================================================================

#[derive(Debug, Deserialize)]
struct CalendarParams {
    year: f64,
    month: f64,
}

fn calendar_generator(params: CalendarParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    if !(1.0..=12.0).contains(&params.month) || params.month.fract() != 0.0 {
        return Err(ToolError::invalid_arguments("month must be an integer from 1 to 12"));
    }
    if !params.year.is_finite() || params.year.abs() > 200_000.0 {
        return Err(ToolError::invalid_arguments("year is out of range"));
    }
    let month = params.month as u32;
    let year = params.year.trunc() as i32;

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ToolError::invalid_arguments("year is out of range"))?;
    let days_in_month = days_in_month(year, month);
    let first_weekday = first.weekday().num_days_from_sunday() as usize;
    let month_name = MONTH_NAMES[month as usize - 1];

    let mut grid = format!("   {month_name} {}\nSun Mon Tue Wed Thu Fri Sat\n", number(params.year));
    grid.push_str(&"    ".repeat(first_weekday));
    for day in 1..=days_in_month {
        grid.push_str(&format!("{day:>3} "));
        if (first_weekday + day as usize) % 7 == 0 {
            grid.push('\n');
        }
    }

    Ok(json!({
        "calendar": grid,
        "year": number(params.year),
        "month": month_name,
        "days_in_month": days_in_month,
        "first_day_of_week": DAY_NAMES[first_weekday],
    }))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

// ============================================================================
// is_holiday
// ============================================================================

#[derive(Debug, Deserialize)]
struct HolidayParams {
    date: String,
}

fn is_holiday(params: HolidayParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let Some(d) = resolve(&params.date, ctx) else {
        return Ok(invalid_date());
    };
    let (month, day, weekday) = (d.month(), d.day(), weekday_index(&d));

    let fixed = FIXED_HOLIDAYS
        .iter()
        .find(|(m, dd, _)| *m == month && *dd == day)
        .map(|(_, _, name)| *name);
    let by_weekday = || {
        WEEKDAY_HOLIDAYS
            .iter()
            .find(|(m, wd, from, to, _)| *m == month && *wd == weekday && (*from..=*to).contains(&day))
            .map(|(.., name)| *name)
    };
    let holiday = fixed.or_else(by_weekday);

    Ok(json!({
        "date": params.date,
        "is_holiday": holiday.is_some(),
        "holiday_name": holiday,
        "day_of_week": &DAY_NAMES[weekday][..3],
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
    fn test_calendar_february_leap_year() {
        let out = ok("calendar_generator", json!({ "year": 2024, "month": 2 }));
        assert_eq!(out["month"], "February");
        assert_eq!(out["days_in_month"], 29);
        assert_eq!(out["first_day_of_week"], "Thursday");

        let grid = out["calendar"].as_str().unwrap();
        assert!(grid.starts_with("   February 2024\nSun Mon Tue Wed Thu Fri Sat\n"));
        let first_week = grid.lines().nth(2).unwrap();
        assert_eq!(first_week, format!("{}  1   2   3 ", " ".repeat(16)));
    }

    #[test]
    fn test_calendar_rejects_bad_month() {
        assert!(run("calendar_generator", json!({ "year": 2024, "month": 13 })).is_err());
        assert!(run("calendar_generator", json!({ "year": 2024, "month": 0 })).is_err());
    }

    #[test]
    fn test_fixed_holidays() {
        let out = ok("is_holiday", json!({ "date": "2024-07-04" }));
        assert_eq!(out["is_holiday"], true);
        assert_eq!(out["holiday_name"], "Independence Day");
        assert_eq!(out["day_of_week"], "Thu");
    }

    #[test]
    fn test_weekday_rule_holidays() {
        let name = |date: &str| ok("is_holiday", json!({ "date": date }))["holiday_name"].clone();
        assert_eq!(name("2024-01-15"), "MLK Jr. Day");
        assert_eq!(name("2024-05-27"), "Memorial Day");
        assert_eq!(name("2024-09-02"), "Labor Day");
        assert_eq!(name("2024-11-28"), "Thanksgiving Day");
    }

    #[test]
    fn test_ordinary_day() {
        let out = ok("is_holiday", json!({ "date": "2024-01-16" }));
        assert_eq!(out["is_holiday"], false);
        assert_eq!(out["holiday_name"], Value::Null);
        assert_eq!(out["day_of_week"], "Tue");
    }
}
