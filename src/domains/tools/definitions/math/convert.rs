//! Unit, currency, percentage and number-notation conversions.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{
    display_value, fmt_number, grouped, number, parse_int_prefix, rounded, to_fixed,
};

/// Largest value rendered as a Roman numeral.
const MAX_ROMAN: i64 = 1_000_000;

const LENGTH_UNITS: &[(&str, f64)] = &[
    ("m", 1.0),
    ("km", 1000.0),
    ("cm", 0.01),
    ("mm", 0.001),
    ("inch", 0.0254),
    ("ft", 0.3048),
    ("yard", 0.9144),
    ("mile", 1609.34),
];

const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("kg", 1.0),
    ("g", 0.001),
    ("mg", 0.000001),
    ("lb", 0.453592),
    ("oz", 0.0283495),
    ("ton", 1000.0),
];

const AREA_UNITS: &[(&str, f64)] = &[
    ("m2", 1.0),
    ("km2", 1e6),
    ("cm2", 0.0001),
    ("ft2", 0.092903),
    ("acre", 4046.86),
    ("hectare", 10000.0),
];

const VOLUME_UNITS: &[(&str, f64)] = &[
    ("l", 1.0),
    ("ml", 0.001),
    ("m3", 1000.0),
    ("gallon", 3.78541),
    ("quart", 0.946353),
    ("cup", 0.236588),
    ("tbsp", 0.0147868),
    ("tsp", 0.00492892),
];

const SPEED_UNITS: &[(&str, f64)] = &[
    ("ms", 1.0),
    ("kmh", 0.277778),
    ("mph", 0.44704),
    ("knot", 0.514444),
    ("fps", 0.3048),
];

/// Approximate units of currency per US dollar.
const USD_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 149.5),
    ("CAD", 1.36),
    ("AUD", 1.53),
    ("CHF", 0.89),
    ("CNY", 7.24),
    ("INR", 83.1),
    ("MXN", 17.1),
    ("BRL", 4.97),
    ("KRW", 1325.0),
    ("SGD", 1.34),
    ("HKD", 7.82),
    ("NOK", 10.55),
    ("SEK", 10.42),
    ("DKK", 6.89),
    ("NZD", 1.63),
    ("ZAR", 18.63),
    ("TRY", 30.5),
    ("AED", 3.67),
    ("SAR", 3.75),
    ("THB", 35.1),
    ("IDR", 15640.0),
    ("MYR", 4.69),
    ("PHP", 56.8),
    ("PKR", 278.0),
    ("EGP", 30.9),
    ("NGN", 775.0),
];

const ROMAN_VALUES: &[(i64, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn lookup(table: &[(&str, f64)], key: &str) -> Option<f64> {
    table.iter().find(|(name, _)| *name == key).map(|(_, v)| *v)
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "unit_converter",
            CATEGORY,
            "Convert between units: length, weight, temperature, area, volume, speed",
            json!({
                "type": "object",
                "properties": {
                    "value": { "type": "number" },
                    "from_unit": { "type": "string" },
                    "to_unit": { "type": "string" },
                    "category": {
                        "type": "string",
                        "enum": ["length", "weight", "temperature", "area", "volume", "speed"]
                    }
                },
                "required": ["value", "from_unit", "to_unit", "category"]
            }),
            unit_converter,
        ),
        ToolDefinition::new(
            "percentage_calculator",
            CATEGORY,
            "Various percentage calculations",
            json!({
                "type": "object",
                "properties": {
                    "operation": {
                        "type": "string",
                        "enum": ["percent_of", "what_percent", "percent_change", "add_percent", "subtract_percent"]
                    },
                    "value1": { "type": "number" },
                    "value2": { "type": "number" }
                },
                "required": ["operation", "value1", "value2"]
            }),
            percentage_calculator,
        ),
        ToolDefinition::new(
            "currency_converter",
            CATEGORY,
            "Convert between major currencies using approximate rates",
            json!({
                "type": "object",
                "properties": {
                    "amount": { "type": "number" },
                    "from": { "type": "string", "description": "Currency code e.g. USD" },
                    "to": { "type": "string", "description": "Currency code e.g. EUR" }
                },
                "required": ["amount", "from", "to"]
            }),
            currency_converter,
        ),
        ToolDefinition::new(
            "roman_numeral_converter",
            CATEGORY,
            "Convert between Roman numerals and integers",
            json!({
                "type": "object",
                "properties": {
                    "value": { "type": "string", "description": "Integer or Roman numeral" },
                    "to": { "type": "string", "enum": ["roman", "integer"] }
                },
                "required": ["value", "to"]
            }),
            roman_numeral_converter,
        ),
        ToolDefinition::new(
            "number_formatter",
            CATEGORY,
            "Format numbers with commas, decimals, and convert to words",
            json!({
                "type": "object",
                "properties": {
                    "number": { "type": "number" },
                    "format": {
                        "type": "string",
                        "enum": ["commas", "scientific", "binary", "hex", "octal", "words"]
                    }
                },
                "required": ["number", "format"]
            }),
            number_formatter,
        ),
    ]
}

// ============================================================================
// unit_converter
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum UnitCategory {
    Length,
    Weight,
    Temperature,
    Area,
    Volume,
    Speed,
}

impl UnitCategory {
    fn units(self) -> &'static [(&'static str, f64)] {
        match self {
            UnitCategory::Length => LENGTH_UNITS,
            UnitCategory::Weight => WEIGHT_UNITS,
            UnitCategory::Area => AREA_UNITS,
            UnitCategory::Volume => VOLUME_UNITS,
            UnitCategory::Speed => SPEED_UNITS,
            UnitCategory::Temperature => &[],
        }
    }
}

#[derive(Debug, Deserialize)]
struct UnitParams {
    value: f64,
    from_unit: String,
    to_unit: String,
    category: UnitCategory,
}

/// Temperatures take `c`, `f`, and anything else as kelvin.
fn unit_converter(params: UnitParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let UnitParams { value, from_unit, to_unit, category } = params;

    if let UnitCategory::Temperature = category {
        let celsius = match from_unit.as_str() {
            "c" => value,
            "f" => (value - 32.0) * 5.0 / 9.0,
            _ => value - 273.15,
        };
        let result = match to_unit.as_str() {
            "c" => celsius,
            "f" => celsius * 9.0 / 5.0 + 32.0,
            _ => celsius + 273.15,
        };
        return Ok(json!({
            "value": number(value),
            "from_unit": from_unit,
            "to_unit": to_unit,
            "result": rounded(result, 3),
        }));
    }

    let units = category.units();
    let (Some(from), Some(to)) = (lookup(units, &from_unit), lookup(units, &to_unit)) else {
        let available: Vec<&str> = units.iter().map(|(name, _)| *name).collect();
        return Ok(json!({ "error": format!("Unknown unit. Available: {}", available.join(", ")) }));
    };

    Ok(json!({
        "value": number(value),
        "from_unit": from_unit,
        "to_unit": to_unit,
        "result": rounded(value * from / to, 6),
    }))
}

// ============================================================================
// percentage_calculator
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PercentOperation {
    PercentOf,
    WhatPercent,
    PercentChange,
    AddPercent,
    SubtractPercent,
}

#[derive(Debug, Deserialize)]
struct PercentParams {
    operation: PercentOperation,
    value1: f64,
    value2: f64,
}

fn percentage_calculator(params: PercentParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let (a, b) = (params.value1, params.value2);
    let (result, description) = match params.operation {
        PercentOperation::PercentOf => {
            let r = (b / 100.0) * a;
            (r, format!("{}% of {} = {}", fmt_number(a), fmt_number(b), fmt_number(r)))
        }
        PercentOperation::WhatPercent => {
            let r = (a / b) * 100.0;
            (r, format!("{} is {}% of {}", fmt_number(a), to_fixed(r, 2), fmt_number(b)))
        }
        PercentOperation::PercentChange => {
            let r = ((b - a) / a) * 100.0;
            (r, format!("Change from {} to {} = {}%", fmt_number(a), fmt_number(b), to_fixed(r, 2)))
        }
        PercentOperation::AddPercent => {
            let r = a + (a * b / 100.0);
            (r, format!("{} + {}% = {}", fmt_number(a), fmt_number(b), fmt_number(r)))
        }
        PercentOperation::SubtractPercent => {
            let r = a - (a * b / 100.0);
            (r, format!("{} - {}% = {}", fmt_number(a), fmt_number(b), fmt_number(r)))
        }
    };

    Ok(json!({ "result": rounded(result, 2), "description": description }))
}

// ============================================================================
// currency_converter
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrencyParams {
    amount: f64,
    from: String,
    to: String,
}

fn currency_converter(params: CurrencyParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let from = params.from.to_uppercase();
    let to = params.to.to_uppercase();
    let Some(from_rate) = lookup(USD_RATES, &from) else {
        return Ok(json!({ "error": format!("Unknown currency: {}", params.from) }));
    };
    let Some(to_rate) = lookup(USD_RATES, &to) else {
        return Ok(json!({ "error": format!("Unknown currency: {}", params.to) }));
    };

    Ok(json!({
        "amount": number(params.amount),
        "from": from,
        "to": to,
        "result": rounded(params.amount / from_rate * to_rate, 2),
        "rate": rounded(to_rate / from_rate, 4),
        "note": "Rates are approximate. Use a financial API for real-time rates.",
    }))
}

// ============================================================================
// roman_numeral_converter
// ============================================================================

#[derive(Debug, Deserialize)]
struct RomanParams {
    value: Value,
    to: String,
}

/// `to` other than `roman` converts towards an integer.
fn roman_numeral_converter(params: RomanParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = display_value(&params.value);

    if params.to == "roman" {
        let mut remaining = parse_int_prefix(&text, 10).unwrap_or(0);
        if remaining > MAX_ROMAN {
            return Err(ToolError::invalid_arguments(format!(
                "value must not exceed {MAX_ROMAN} for Roman numerals"
            )));
        }
        let mut roman = String::new();
        for (value, symbol) in ROMAN_VALUES {
            while remaining >= *value {
                roman.push_str(symbol);
                remaining -= value;
            }
        }
        return Ok(json!({ "input": params.value, "result": roman }));
    }

    Ok(json!({ "input": params.value, "result": number(roman_to_integer(&text)) }))
}

/// Subtractive-notation sum; any unknown symbol makes the result NaN.
fn roman_to_integer(numeral: &str) -> f64 {
    let symbol_value = |c: char| match c {
        'I' => Some(1.0),
        'V' => Some(5.0),
        'X' => Some(10.0),
        'L' => Some(50.0),
        'C' => Some(100.0),
        'D' => Some(500.0),
        'M' => Some(1000.0),
        _ => None,
    };

    let symbols: Vec<Option<f64>> = numeral.to_uppercase().chars().map(symbol_value).collect();
    let mut total = 0.0;
    for (i, current) in symbols.iter().enumerate() {
        let Some(current) = current else {
            return f64::NAN;
        };
        match symbols.get(i + 1).copied().flatten() {
            Some(next) if *current < next => total -= current,
            _ => total += current,
        }
    }
    total
}

// ============================================================================
// number_formatter
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NumberFormat {
    Commas,
    Scientific,
    Binary,
    Hex,
    Octal,
    Words,
}

#[derive(Debug, Deserialize)]
struct FormatterParams {
    number: f64,
    format: NumberFormat,
}

fn number_formatter(params: FormatterParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let x = params.number;
    let (label, result) = match params.format {
        NumberFormat::Commas => ("commas", grouped(x)),
        NumberFormat::Scientific => ("scientific", to_exponential(x, 4)),
        NumberFormat::Binary => ("binary", radix_string(x.floor(), 2)),
        NumberFormat::Hex => ("hex", radix_string(x.floor(), 16).to_uppercase()),
        NumberFormat::Octal => ("octal", radix_string(x.floor(), 8)),
        NumberFormat::Words => ("words", to_words(x.floor())),
    };
    Ok(json!({ "number": number(x), "format": label, "result": result }))
}

/// `1.2346e+4` style, with an explicit exponent sign.
fn to_exponential(x: f64, digits: usize) -> String {
    if !x.is_finite() {
        return fmt_number(x);
    }
    let rendered = format!("{x:.digits$e}");
    match rendered.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => rendered,
    }
}

/// Digits of an integral value in a power-of-two radix. Division by the
/// radix is exact in binary floating point, so large values keep every digit.
fn radix_string(x: f64, radix: u32) -> String {
    if !x.is_finite() {
        return fmt_number(x);
    }
    let base = f64::from(radix);
    let mut value = x.abs();
    let mut digits = Vec::new();
    while value >= 1.0 {
        let digit = value % base;
        digits.push(std::char::from_digit(digit as u32, radix).unwrap_or('0'));
        value = (value - digit) / base;
    }
    if digits.is_empty() {
        digits.push('0');
    }
    if x < 0.0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

const ONES: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// English words for an integral value (short scale, billions and up
/// expressed as multiples of a billion).
fn to_words(n: f64) -> String {
    if !n.is_finite() {
        return fmt_number(n);
    }
    if n == 0.0 {
        return "zero".to_string();
    }
    if n < 0.0 {
        return format!("negative {}", to_words(-n));
    }

    let scaled = |divisor: f64, unit: &str| {
        let head = to_words((n / divisor).floor());
        let rest = n % divisor;
        if rest > 0.0 {
            format!("{head} {unit} {}", to_words(rest))
        } else {
            format!("{head} {unit}")
        }
    };

    if n < 20.0 {
        ONES[n as usize].to_string()
    } else if n < 100.0 {
        let ones = n as usize % 10;
        let tens = TENS[n as usize / 10];
        if ones > 0 {
            format!("{tens}-{}", ONES[ones])
        } else {
            tens.to_string()
        }
    } else if n < 1000.0 {
        let rest = n % 100.0;
        let head = format!("{} hundred", ONES[(n / 100.0) as usize]);
        if rest > 0.0 {
            format!("{head} {}", to_words(rest))
        } else {
            head
        }
    } else if n < 1e6 {
        scaled(1e3, "thousand")
    } else if n < 1e9 {
        scaled(1e6, "million")
    } else {
        scaled(1e9, "billion")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{ok, run};

    #[test]
    fn test_length_conversion() {
        let out = ok(
            "unit_converter",
            json!({ "value": 1, "from_unit": "mile", "to_unit": "km", "category": "length" }),
        );
        assert_eq!(out["result"], 1.60934);
    }

    #[test]
    fn test_temperature_conversion() {
        let out = ok(
            "unit_converter",
            json!({ "value": 212, "from_unit": "f", "to_unit": "c", "category": "temperature" }),
        );
        assert_eq!(out["result"], 100);

        let out = ok(
            "unit_converter",
            json!({ "value": 0, "from_unit": "c", "to_unit": "k", "category": "temperature" }),
        );
        assert_eq!(out["result"], 273.15);
    }

    #[test]
    fn test_unknown_unit_is_soft_error() {
        let out = ok(
            "unit_converter",
            json!({ "value": 1, "from_unit": "parsec", "to_unit": "m", "category": "length" }),
        );
        assert_eq!(
            out["error"],
            "Unknown unit. Available: m, km, cm, mm, inch, ft, yard, mile"
        );
    }

    #[test]
    fn test_unknown_category_is_thrown() {
        let err = run(
            "unit_converter",
            json!({ "value": 1, "from_unit": "m", "to_unit": "m", "category": "time" }),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_percentages() {
        let out = ok(
            "percentage_calculator",
            json!({ "operation": "percent_of", "value1": 15, "value2": 200 }),
        );
        assert_eq!(out["result"], 30);
        assert_eq!(out["description"], "15% of 200 = 30");

        let out = ok(
            "percentage_calculator",
            json!({ "operation": "percent_change", "value1": 80, "value2": 100 }),
        );
        assert_eq!(out["result"], 25);
        assert_eq!(out["description"], "Change from 80 to 100 = 25.00%");

        let out = ok(
            "percentage_calculator",
            json!({ "operation": "what_percent", "value1": 1, "value2": 3 }),
        );
        assert_eq!(out["result"], 33.33);
    }

    #[test]
    fn test_currency_conversion() {
        let out = ok("currency_converter", json!({ "amount": 100, "from": "usd", "to": "eur" }));
        assert_eq!(out["result"], 92);
        assert_eq!(out["from"], "USD");
        assert_eq!(out["rate"], 0.92);

        let out = ok("currency_converter", json!({ "amount": 1, "from": "XXX", "to": "EUR" }));
        assert_eq!(out["error"], "Unknown currency: XXX");
    }

    #[test]
    fn test_roman_numerals() {
        let out = ok("roman_numeral_converter", json!({ "value": "1994", "to": "roman" }));
        assert_eq!(out["result"], "MCMXCIV");

        let out = ok("roman_numeral_converter", json!({ "value": "mcmxciv", "to": "integer" }));
        assert_eq!(out["result"], 1994);

        let out = ok("roman_numeral_converter", json!({ "value": "XIZ", "to": "integer" }));
        assert_eq!(out["result"], Value::Null);

        let out = ok("roman_numeral_converter", json!({ "value": 9, "to": "roman" }));
        assert_eq!(out["result"], "IX");
        assert_eq!(out["input"], 9);
    }

    #[test]
    fn test_number_formats() {
        let format = |n: f64, f: &str| ok("number_formatter", json!({ "number": n, "format": f }))["result"].clone();
        assert_eq!(format(1234567.891, "commas"), "1,234,567.891");
        assert_eq!(format(12345.0, "scientific"), "1.2345e+4");
        assert_eq!(format(10.7, "binary"), "1010");
        assert_eq!(format(255.0, "hex"), "FF");
        assert_eq!(format(-8.0, "octal"), "-10");
        assert_eq!(format(0.0, "words"), "zero");
    }

    #[test]
    fn test_to_words() {
        assert_eq!(to_words(42.0), "forty-two");
        assert_eq!(to_words(105.0), "one hundred five");
        assert_eq!(
            to_words(1_234_567.0),
            "one million two hundred thirty-four thousand five hundred sixty-seven"
        );
        assert_eq!(to_words(-3.0), "negative three");
        assert_eq!(to_words(2e9), "two billion");
    }
}
