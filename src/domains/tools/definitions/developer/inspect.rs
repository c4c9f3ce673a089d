//! Looking at existing artifacts: checksums, code metrics, cron schedules and
//! a reference table of common regexes.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{number, round_half_up, static_regex, to_int32};

/// `(name, pattern, description)`
const REGEX_PATTERNS: &[(&str, &str, &str)] = &[
    ("email", r"/^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$/", "Standard email validation"),
    ("phone_us", r"/^(\+1)?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$/", "US phone number"),
    (
        "url",
        r"/https?:\/\/(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&\/=]*)/",
        "URL with http/https",
    ),
    (
        "ip_address",
        r"/^((25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(25[0-5]|2[0-4]\d|[01]?\d\d?)$/",
        "IPv4 address",
    ),
    (
        "credit_card",
        r"/^(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|3(?:0[0-5]|[68][0-9])[0-9]{11})$/",
        "Visa, MC, Amex, Discover",
    ),
    ("zip_code", r"/^\d{5}(-\d{4})?$/", "US ZIP code"),
    ("date_us", r"/^(0[1-9]|1[0-2])\/(0[1-9]|[12]\d|3[01])\/(19|20)\d{2}$/", "US date MM/DD/YYYY"),
    ("date_iso", r"/^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$/", "ISO date YYYY-MM-DD"),
    ("hex_color", r"/^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$/", "Hexadecimal color"),
    ("username", r"/^[a-zA-Z0-9_]{3,20}$/", "Username 3-20 chars, letters, numbers, underscore"),
    (
        "strong_password",
        r"/^(?=.*[a-z])(?=.*[A-Z])(?=.*\d)(?=.*[@$!%*?&])[A-Za-z\d@$!%*?&]{8,}$/",
        "Min 8 chars, upper, lower, number, special char",
    ),
    ("ssn", r"/^\d{3}-\d{2}-\d{4}$/", "US Social Security Number"),
    ("mac_address", r"/^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$/", "MAC address"),
];

const MONTHS: [&str; 12] = [
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

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const COMMON_SCHEDULES: [(&str, &str); 6] = [
    ("* * * * *", "Every minute"),
    ("0 * * * *", "Every hour"),
    ("0 9 * * 1-5", "Every weekday at 9 AM"),
    ("0 0 * * *", "Daily at midnight"),
    ("0 0 * * 0", "Weekly on Sunday"),
    ("0 0 1 * *", "Monthly on 1st"),
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "hash_generator",
            CATEGORY,
            "Generate checksums and hashes (CRC32, basic hashes)",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "algorithm": { "type": "string", "enum": ["simple32", "djb2", "sdbm", "adler32"] }
                },
                "required": ["text", "algorithm"]
            }),
            hash_generator,
        ),
        ToolDefinition::new(
            "generate_regex",
            CATEGORY,
            "Generate common regex patterns",
            json!({
                "type": "object",
                "properties": {
                    "pattern_type": {
                        "type": "string",
                        "enum": REGEX_PATTERNS.iter().map(|(name, ..)| *name).collect::<Vec<_>>()
                    }
                },
                "required": ["pattern_type"]
            }),
            generate_regex,
        ),
        ToolDefinition::new(
            "code_complexity",
            CATEGORY,
            "Analyze code complexity metrics",
            json!({
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "language": { "type": "string", "enum": ["javascript", "python", "java", "generic"] }
                },
                "required": ["code"]
            }),
            code_complexity,
        ),
        ToolDefinition::new(
            "cron_expression_parser",
            CATEGORY,
            "Parse and explain cron expressions",
            json!({
                "type": "object",
                "properties": {
                    "expression": { "type": "string", "description": "Cron expression e.g. '0 9 * * 1-5'" }
                },
                "required": ["expression"]
            }),
            cron_expression_parser,
        ),
    ]
}

// ============================================================================
// hash_generator
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum HashAlgorithm {
    Simple32,
    Djb2,
    Sdbm,
    Adler32,
}

impl HashAlgorithm {
    fn label(self) -> &'static str {
        match self {
            Self::Simple32 => "simple32",
            Self::Djb2 => "djb2",
            Self::Sdbm => "sdbm",
            Self::Adler32 => "adler32",
        }
    }
}

#[derive(Debug, Deserialize)]
struct HashParams {
    text: String,
    algorithm: HashAlgorithm,
}

/// Non-cryptographic checksums over UTF-16 code units, rendered in hex.
fn hash_generator(params: HashParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let units: Vec<u16> = params.text.encode_utf16().collect();
    let hash = match params.algorithm {
        HashAlgorithm::Simple32 => simple32(&units),
        HashAlgorithm::Djb2 => djb2(&units),
        HashAlgorithm::Sdbm => sdbm(&units),
        HashAlgorithm::Adler32 => adler32(&units),
    };

    Ok(json!({
        "text": params.text,
        "algorithm": params.algorithm.label(),
        "hash": hash,
        "note": "For cryptographic hashing use SHA-256",
    }))
}

fn simple32(units: &[u16]) -> String {
    let h = units
        .iter()
        .fold(0i32, |h, &c| h.wrapping_mul(31).wrapping_add(i32::from(c)));
    format!("{:08x}", h as u32)
}

// djb2 and sdbm shift a 32-bit view of the running value but accumulate in
// full double precision, so the state stays an f64.

fn djb2(units: &[u16]) -> String {
    let h = units.iter().fold(5381.0f64, |h, &c| {
        f64::from(to_int32(h).wrapping_shl(5)) + h + f64::from(c)
    });
    format!("{:x}", to_int32(h) as u32)
}

fn sdbm(units: &[u16]) -> String {
    let h = units.iter().fold(0.0f64, |h, &c| {
        let bits = to_int32(h);
        f64::from(c) + f64::from(bits.wrapping_shl(6)) + f64::from(bits.wrapping_shl(16)) - h
    });
    format!("{:x}", to_int32(h) as u32)
}

/// Signed 32-bit result, so large sums print with a leading minus.
fn adler32(units: &[u16]) -> String {
    const MOD_ADLER: u32 = 65_521;
    let (a, b) = units.iter().fold((1u32, 0u32), |(a, b), &c| {
        let a = (a + u32::from(c)) % MOD_ADLER;
        (a, (b + a) % MOD_ADLER)
    });
    let value = ((b << 16) | a) as i32;
    if value < 0 {
        format!("-{:x}", value.unsigned_abs())
    } else {
        format!("{value:x}")
    }
}

// ============================================================================
// generate_regex
// ============================================================================

#[derive(Debug, Deserialize)]
struct RegexParams {
    pattern_type: String,
}

fn generate_regex(params: RegexParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let found = REGEX_PATTERNS
        .iter()
        .find(|(name, ..)| *name == params.pattern_type);
    let Some((_, pattern, description)) = found else {
        let available: Vec<&str> = REGEX_PATTERNS.iter().map(|(name, ..)| *name).collect();
        return Ok(json!({
            "pattern_type": params.pattern_type,
            "error": format!("Unknown pattern type. Available: {}", available.join(", ")),
        }));
    };

    Ok(json!({
        "pattern_type": params.pattern_type,
        "pattern": pattern,
        "description": description,
    }))
}

// ============================================================================
// code_complexity
// ============================================================================

static_regex!(
    FUNCTION_DECL,
    r"function\s+[A-Za-z0-9_]+|def\s+[A-Za-z0-9_]+|const\s+[A-Za-z0-9_]+\s*=\s*(?:async\s*)?\("
);
static_regex!(BRANCH_KEYWORD, r"\b(?:if|else|switch|case|while|for|catch)\b");

#[derive(Debug, Deserialize)]
struct ComplexityParams {
    code: String,
}

/// Keyword-counting estimate of cyclomatic complexity. Lines starting with
/// `//`, `#` or `*` count as comments.
fn code_complexity(params: ComplexityParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let lines: Vec<&str> = params.code.split('\n').collect();
    let blank_lines = lines.iter().filter(|l| l.trim().is_empty()).count();
    let code_lines = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("//") && !l.starts_with('#') && !l.starts_with('*'))
        .count();

    let functions = FUNCTION_DECL.find_iter(&params.code).count();
    let complexity = 1 + BRANCH_KEYWORD.find_iter(&params.code).count();
    let level = match complexity {
        0..=5 => "Low",
        6..=10 => "Medium",
        11..=20 => "High",
        _ => "Very High",
    };
    let total_width: usize = lines.iter().map(|l| l.encode_utf16().count()).sum();

    Ok(json!({
        "total_lines": lines.len(),
        "code_lines": code_lines,
        "blank_lines": blank_lines,
        "comment_lines": lines.len() - code_lines - blank_lines,
        "functions_detected": functions,
        "cyclomatic_complexity": complexity,
        "complexity_level": level,
        "avg_line_length": number(round_half_up(total_width as f64 / lines.len() as f64)),
        "recommendation": if complexity > 10 {
            "Consider refactoring complex functions"
        } else {
            "Code complexity is acceptable"
        },
    }))
}

// ============================================================================
// cron_expression_parser
// ============================================================================

#[derive(Debug, Deserialize)]
struct CronParams {
    expression: String,
}

/// Explains the five standard fields; no validation of field ranges.
fn cron_expression_parser(params: CronParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let parts: Vec<&str> = params.expression.split_whitespace().collect();
    let [minute, hour, day, month, weekday] = parts.as_slice() else {
        return Ok(json!({ "error": "Cron must have 5 parts: minute hour day month weekday" }));
    };

    let breakdown = [
        explain_field(minute, "minute", None),
        explain_field(hour, "hour", None),
        explain_field(day, "day", None),
        explain_field(month, "month", Some(month_label)),
        explain_field(weekday, "weekday", Some(weekday_label)),
    ];
    let human_readable = COMMON_SCHEDULES
        .iter()
        .find(|(expr, _)| *expr == params.expression)
        .map_or_else(|| format!("At {}", breakdown.join(" | ")), |(_, text)| text.to_string());
    let [minute, hour, day, month, weekday] = breakdown;

    Ok(json!({
        "expression": params.expression,
        "human_readable": human_readable,
        "breakdown": {
            "minute": minute,
            "hour": hour,
            "day": day,
            "month": month,
            "weekday": weekday,
        },
        "common_patterns": [
            "* * * * * (Every minute)",
            "0 * * * * (Every hour)",
            "0 9 * * 1-5 (Weekdays 9AM)",
            "0 0 * * * (Daily midnight)",
            "0 0 1 * * (Monthly)"
        ],
    }))
}

/// Describe one field. Ranges win over steps, steps over lists; a single
/// value gets the field's named label when it has one.
fn explain_field(value: &str, name: &str, label: Option<fn(&str) -> &'static str>) -> String {
    if value == "*" {
        format!("Every {name}")
    } else if value.contains('-') {
        format!("{name}s {value}")
    } else if value.contains('/') {
        let step = value.split('/').nth(1).unwrap_or_default();
        format!("Every {step} {name}s")
    } else if value.contains(',') {
        format!("{name}s: {value}")
    } else {
        match label {
            Some(label) => format!("{name} {value} ({})", label(value)),
            None => format!("{name} {value}"),
        }
    }
}

/// Name for a field value spelled exactly as its number, `1` to `12`.
fn month_label(value: &str) -> &'static str {
    named_value(&MONTHS, 1, value)
}

/// Name for a field value spelled exactly as its number, `0` to `6`.
fn weekday_label(value: &str) -> &'static str {
    named_value(&WEEKDAYS, 0, value)
}

fn named_value(names: &[&'static str], first: usize, value: &str) -> &'static str {
    names
        .iter()
        .zip(first..)
        .find(|(_, n)| n.to_string() == value)
        .map_or("", |(name, _)| *name)
}

// ============================================================================
// Tests
// ============================================================================
