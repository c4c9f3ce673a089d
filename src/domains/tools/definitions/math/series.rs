//! Number sequences and summary statistics.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{number, rounded, slice_end};

/// Divisors are enumerated only up to this magnitude.
const MAX_DIVISOR_INPUT: f64 = 1e12;
/// Every `f64` integer above this is even, so primality is settled.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;
const MAX_FIBONACCI_TERMS: f64 = 50.0;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "statistics_calculator",
            CATEGORY,
            "Calculate mean, median, mode, std dev, variance from a list of numbers",
            json!({
                "type": "object",
                "properties": {
                    "numbers": { "type": "array", "items": { "type": "number" } }
                },
                "required": ["numbers"]
            }),
            statistics_calculator,
        ),
        ToolDefinition::new(
            "prime_checker",
            CATEGORY,
            "Check if a number is prime and find factors",
            json!({
                "type": "object",
                "properties": { "number": { "type": "number" } },
                "required": ["number"]
            }),
            prime_checker,
        ),
        ToolDefinition::new(
            "fibonacci",
            CATEGORY,
            "Generate Fibonacci sequence up to N terms",
            json!({
                "type": "object",
                "properties": {
                    "terms": { "type": "number", "description": "Number of terms (max 50)" }
                },
                "required": ["terms"]
            }),
            fibonacci,
        ),
    ]
}

// ============================================================================
// statistics_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct StatisticsParams {
    numbers: Vec<f64>,
}

fn statistics_calculator(params: StatisticsParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let numbers = params.numbers;
    let n = numbers.len();
    if n == 0 {
        return Ok(json!({ "error": "Empty array" }));
    }

    let mut sorted = numbers.clone();
    sorted.sort_by(f64::total_cmp);

    let sum: f64 = numbers.iter().sum();
    let mean = sum / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    Ok(json!({
        "count": n,
        "sum": number(sum),
        "mean": rounded(mean, 3),
        "median": number(median),
        "mode": modes(&sorted).into_iter().map(number).collect::<Vec<_>>(),
        "min": number(sorted[0]),
        "max": number(sorted[n - 1]),
        "range": number(sorted[n - 1] - sorted[0]),
        "variance": rounded(variance, 3),
        "std_deviation": rounded(variance.sqrt(), 3),
        "q1": number(sorted[n / 4]),
        "q3": number(sorted[n * 3 / 4]),
    }))
}

/// Most frequent values in ascending order. `-0` counts as `0`.
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut frequency: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for &x in sorted {
        let x = if x == 0.0 { 0.0 } else { x };
        let key = total_order_key(x);
        frequency.entry(key).or_insert((x, 0)).1 += 1;
    }
    let top = frequency.values().map(|(_, count)| *count).max().unwrap_or(0);
    frequency
        .into_values()
        .filter(|(_, count)| *count == top)
        .map(|(value, _)| value)
        .collect()
}

/// Map a float onto an integer with the same ordering.
fn total_order_key(x: f64) -> i64 {
    let bits = x.to_bits() as i64;
    bits ^ (((bits >> 63) as u64) >> 1) as i64
}

// ============================================================================
// prime_checker
// ============================================================================

#[derive(Debug, Deserialize)]
struct PrimeParams {
    number: f64,
}

fn prime_checker(params: PrimeParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let n = params.number.floor().abs();
    let prime = is_prime(n);

    if n > MAX_DIVISOR_INPUT {
        return Ok(json!({
            "number": number(n),
            "is_prime": prime,
            "factors": Value::Null,
            "factor_count": Value::Null,
            "note": "Factors are listed only for numbers up to 1e12",
        }));
    }

    let factors = divisors(n as u64);
    let factor_count = factors.len();
    Ok(json!({
        "number": number(n),
        "is_prime": prime,
        "factors": factors,
        "factor_count": factor_count,
    }))
}

fn is_prime(n: f64) -> bool {
    if n < 2.0 {
        return false;
    }
    if n > MAX_EXACT_INTEGER {
        return false;
    }
    let n = n as u64;
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// All positive divisors in ascending order, found by pairing below the root.
fn divisors(n: u64) -> Vec<u64> {
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut i = 1u64;
    while i * i <= n {
        if n % i == 0 {
            low.push(i);
            if i != n / i {
                high.push(n / i);
            }
        }
        i += 1;
    }
    low.extend(high.into_iter().rev());
    low
}

// ============================================================================
// fibonacci
// ============================================================================

#[derive(Debug, Deserialize)]
struct FibonacciParams {
    terms: f64,
}

fn fibonacci(params: FibonacciParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let terms = params.terms.min(MAX_FIBONACCI_TERMS);

    let mut sequence: Vec<u64> = vec![0, 1];
    let mut i = 2.0;
    while i < terms {
        let len = sequence.len();
        sequence.push(sequence[len - 1] + sequence[len - 2]);
        i += 1.0;
    }

    let end = slice_end(sequence.len(), terms);
    let mut out = json!({
        "sequence": &sequence[..end],
        "terms": number(terms),
    });
    if terms >= 1.0 && terms.fract() == 0.0 {
        out["last_value"] = json!(sequence[terms as usize - 1]);
    }
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::ok;

    #[test]
    fn test_statistics() {
        let out = ok("statistics_calculator", json!({ "numbers": [4, 1, 2, 2, 3, 4] }));
        assert_eq!(out["count"], 6);
        assert_eq!(out["sum"], 16);
        assert_eq!(out["mean"], 2.667);
        assert_eq!(out["median"], 2.5);
        assert_eq!(out["mode"], json!([2, 4]));
        assert_eq!(out["min"], 1);
        assert_eq!(out["max"], 4);
        assert_eq!(out["range"], 3);
        assert_eq!(out["q1"], 2);
        assert_eq!(out["q3"], 4);
    }

    #[test]
    fn test_statistics_empty_is_soft_error() {
        let out = ok("statistics_calculator", json!({ "numbers": [] }));
        assert_eq!(out["error"], "Empty array");
    }

    #[test]
    fn test_modes_are_ascending() {
        assert_eq!(modes(&[-2.5, -0.0, 0.0, 3.0, 3.0]), vec![0.0, 3.0]);
    }

    #[test]
    fn test_prime_checker() {
        let out = ok("prime_checker", json!({ "number": 13 }));
        assert_eq!(out["is_prime"], true);
        assert_eq!(out["factors"], json!([1, 13]));

        let out = ok("prime_checker", json!({ "number": -12.7 }));
        assert_eq!(out["number"], 13);

        let out = ok("prime_checker", json!({ "number": 36 }));
        assert_eq!(out["is_prime"], false);
        assert_eq!(out["factors"], json!([1, 2, 3, 4, 6, 9, 12, 18, 36]));
        assert_eq!(out["factor_count"], 9);
    }

    #[test]
    fn test_prime_checker_large_input() {
        let out = ok("prime_checker", json!({ "number": 1_000_000_000_039u64 }));
        assert_eq!(out["is_prime"], true);
        assert_eq!(out["factors"], Value::Null);
    }

    #[test]
    fn test_small_primes() {
        let primes: Vec<u32> = (0..30).filter(|n| is_prime(f64::from(*n))).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_fibonacci() {
        let out = ok("fibonacci", json!({ "terms": 10 }));
        assert_eq!(out["sequence"], json!([0, 1, 1, 2, 3, 5, 8, 13, 21, 34]));
        assert_eq!(out["last_value"], 34);

        let out = ok("fibonacci", json!({ "terms": 1 }));
        assert_eq!(out["sequence"], json!([0]));
    }

    #[test]
    fn test_fibonacci_capped() {
        let out = ok("fibonacci", json!({ "terms": 500 }));
        assert_eq!(out["terms"], 50);
        assert_eq!(out["sequence"].as_array().unwrap().len(), 50);
        assert_eq!(out["last_value"], 7_778_742_049u64);
    }

    #[test]
    fn test_fibonacci_zero_terms() {
        let out = ok("fibonacci", json!({ "terms": 0 }));
        assert_eq!(out["sequence"], json!([]));
        assert!(out.get("last_value").is_none());
    }
}
