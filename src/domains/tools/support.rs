//! Helpers shared by the tool definitions.
//!
//! Tool results are JSON documents, so most of this is about printing numbers
//! and dates consistently: integral values as JSON integers, rounding half up,
//! English digit grouping, UTC date parsing.

use std::collections::HashSet;
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};

/// Declare a lazily compiled regex for a pattern literal.
macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
            regex::Regex::new($pattern).expect("built-in pattern compiles")
        });
    };
}

pub(crate) use static_regex;

// ============================================================================
// Numbers
// ============================================================================

/// Largest magnitude for which an integral `f64` is emitted as a JSON integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert a numeric result into a JSON value.
///
/// Integral values become JSON integers, other finite values stay floats and
/// non-finite values become `null`.
pub fn number(x: f64) -> Value {
    if !x.is_finite() {
        return Value::Null;
    }
    if x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER {
        return Value::from(x as i64);
    }
    Value::from(x)
}

/// Round half up (towards positive infinity on ties).
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round to `places` decimal places, ties towards positive infinity.
pub fn round_to(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    round_half_up(x * factor) / factor
}

/// Shorthand for `number(round_to(x, places))`.
pub fn rounded(x: f64, places: i32) -> Value {
    number(round_to(x, places))
}

/// Wrap a number into a signed 32-bit integer; non-finite values become 0.
pub fn to_int32(x: f64) -> i32 {
    if !x.is_finite() {
        return 0;
    }
    let wrapped = x.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32 as i32
}

/// Shortest round-trip rendering of a number, as used inside generated text.
pub fn fmt_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let magnitude = x.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let rendered = format!("{x:e}");
        return match rendered.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => rendered,
        };
    }
    format!("{x}")
}

/// Fixed-point rendering with `digits` decimals.
pub fn to_fixed(x: f64, digits: usize) -> String {
    if !x.is_finite() {
        return fmt_number(x);
    }
    let factor = 10f64.powi(digits as i32);
    let value = (x.abs() * factor).round() / factor;
    let sign = if x < 0.0 && value != 0.0 { "-" } else { "" };
    format!("{sign}{value:.digits$}")
}

/// English grouping with at most three fraction digits, e.g. `1,234.568`.
pub fn grouped(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    let fixed = to_fixed(x.abs(), 3);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    if x < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}

/// Parse the leading integer of a string the lenient way: leading whitespace,
/// an optional sign, then as many digits of `radix` as are present.
pub fn parse_int_prefix(input: &str, radix: u32) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return None;
    }
    let value = i64::from_str_radix(&digits, radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Resolve an end index the way a relative slice end works: negative values
/// count back from `len`, fractions truncate, the result is clamped.
pub fn slice_end(len: usize, end: f64) -> usize {
    if end.is_nan() {
        return 0;
    }
    let end = end.trunc();
    if end < 0.0 {
        (len as f64 + end).max(0.0) as usize
    } else {
        end.min(len as f64) as usize
    }
}

/// Clamp a requested repetition count into `0..=cap`.
pub fn capped_count(requested: f64, cap: usize) -> usize {
    if requested.is_nan() || requested <= 0.0 {
        return 0;
    }
    requested.trunc().min(cap as f64) as usize
}

/// First `end` characters of `text`, with [`slice_end`] semantics.
pub fn char_prefix(text: &str, end: f64) -> String {
    let len = text.chars().count();
    text.chars().take(slice_end(len, end)).collect()
}

// ============================================================================
// Text
// ============================================================================

/// Characters left unescaped by URI component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string for use as a single URI component.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Render any JSON value as plain text: strings verbatim, arrays comma-joined,
/// objects as an opaque marker.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(fmt_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Drop repeated items, keeping first occurrences in order.
pub fn unique_in_order<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Upper-case the first character and leave the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Numeric field of a loosely-typed object; missing or non-numeric is NaN.
pub fn field_f64(object: &Map<String, Value>, key: &str) -> f64 {
    object.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN)
}

// ============================================================================
// Dates
// ============================================================================

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parse a date or date-time in UTC. `now` resolves to the supplied instant.
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("now") {
        return Some(now);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// `2024-01-15T10:30:00.000Z`
pub fn iso_string(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// `Mon Jan 15 2024`
pub fn date_string(dt: &DateTime<Utc>) -> String {
    dt.format("%a %b %d %Y").to_string()
}

/// `2024-01-15`
pub fn iso_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Whole milliseconds between two instants (`to - from`).
pub fn millis_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> f64 {
    (*to - *from).num_milliseconds() as f64
}

pub const MS_PER_SECOND: f64 = 1_000.0;
pub const MS_PER_MINUTE: f64 = 60_000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const MS_PER_DAY: f64 = 86_400_000.0;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_number_prefers_integers() {
        assert_eq!(number(11.0), json!(11));
        assert_eq!(number(2.5), json!(2.5));
        assert_eq!(number(f64::NAN), Value::Null);
        assert_eq!(number(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_round_to_half_up() {
        assert_eq!(round_to(0.5, 0), 1.0);
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(12.3456, 2), 12.35);
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(50.0), "50");
        assert_eq!(fmt_number(0.5), "0.5");
        assert_eq!(fmt_number(-0.0), "0");
        assert_eq!(fmt_number(1e21), "1e+21");
        assert_eq!(fmt_number(1.5e-7), "1.5e-7");
        assert_eq!(fmt_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(grouped(1234567.891), "1,234,567.891");
        assert_eq!(grouped(1000.0), "1,000");
        assert_eq!(grouped(-1234.5), "-1,234.5");
        assert_eq!(grouped(0.1 + 0.2), "0.3");
        assert_eq!(grouped(999.9999), "1,000");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(3.14159, 2), "3.14");
        assert_eq!(to_fixed(2.0, 2), "2.00");
        assert_eq!(to_fixed(-0.001, 2), "0.00");
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42abc", 10), Some(42));
        assert_eq!(parse_int_prefix("  -7", 10), Some(-7));
        assert_eq!(parse_int_prefix("ff", 16), Some(255));
        assert_eq!(parse_int_prefix("xyz", 10), None);
    }

    #[test]
    fn test_slice_end() {
        assert_eq!(slice_end(5, 3.0), 3);
        assert_eq!(slice_end(5, 10.0), 5);
        assert_eq!(slice_end(5, -1.0), 4);
        assert_eq!(slice_end(5, -9.0), 0);
        assert_eq!(slice_end(5, 2.7), 2);
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_uri_component("it's (ok)!"), "it's%20(ok)!");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!([1, null, "a"])), "1,,a");
        assert_eq!(display_value(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_parse_date_forms() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-01-15", now), Some(midnight));
        assert_eq!(parse_date("01/15/2024", now), Some(midnight));
        assert_eq!(parse_date("January 15, 2024", now), Some(midnight));
        assert_eq!(
            parse_date("2024-01-15T10:30:00Z", now),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-15 10:30:00", now),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(parse_date("now", now), Some(now));
        assert_eq!(parse_date("not a date", now), None);
    }

    #[test]
    fn test_date_strings() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(iso_string(&dt), "2024-01-15T10:30:00.000Z");
        assert_eq!(date_string(&dt), "Mon Jan 15 2024");
        assert_eq!(iso_date(&dt), "2024-01-15");
    }
}
