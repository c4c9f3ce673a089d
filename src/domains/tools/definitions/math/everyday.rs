//! Everyday calculators: body mass, interest, loans, tips, tax and age.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{
    MS_PER_DAY, capped_count, fmt_number, millis_between, number, parse_date, round_half_up, rounded,
};

const MAX_BREAKDOWN_YEARS: usize = 30;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "bmi_calculator",
            CATEGORY,
            "Calculate BMI and category",
            json!({
                "type": "object",
                "properties": {
                    "weight_kg": { "type": "number" },
                    "height_cm": { "type": "number" }
                },
                "required": ["weight_kg", "height_cm"]
            }),
            bmi_calculator,
        ),
        ToolDefinition::new(
            "compound_interest",
            CATEGORY,
            "Calculate compound interest",
            json!({
                "type": "object",
                "properties": {
                    "principal": { "type": "number" },
                    "rate_percent": { "type": "number" },
                    "years": { "type": "number" },
                    "compounds_per_year": { "type": "number", "default": 12 }
                },
                "required": ["principal", "rate_percent", "years"]
            }),
            compound_interest,
        ),
        ToolDefinition::new(
            "loan_calculator",
            CATEGORY,
            "Calculate monthly loan payment, total interest",
            json!({
                "type": "object",
                "properties": {
                    "principal": { "type": "number" },
                    "annual_rate_percent": { "type": "number" },
                    "years": { "type": "number" }
                },
                "required": ["principal", "annual_rate_percent", "years"]
            }),
            loan_calculator,
        ),
        ToolDefinition::new(
            "tip_calculator",
            CATEGORY,
            "Calculate tip and split bill",
            json!({
                "type": "object",
                "properties": {
                    "bill_amount": { "type": "number" },
                    "tip_percent": { "type": "number", "default": 18 },
                    "people": { "type": "number", "default": 1 }
                },
                "required": ["bill_amount"]
            }),
            tip_calculator,
        ),
        ToolDefinition::new(
            "tax_calculator",
            CATEGORY,
            "Calculate tax amount and total",
            json!({
                "type": "object",
                "properties": {
                    "amount": { "type": "number" },
                    "tax_rate_percent": { "type": "number" },
                    "tax_type": { "type": "string", "enum": ["add_tax", "remove_tax"], "default": "add_tax" }
                },
                "required": ["amount", "tax_rate_percent"]
            }),
            tax_calculator,
        ),
        ToolDefinition::new(
            "age_calculator",
            CATEGORY,
            "Calculate age and days until next birthday",
            json!({
                "type": "object",
                "properties": {
                    "birth_date": { "type": "string", "description": "Date in YYYY-MM-DD format" },
                    "reference_date": { "type": "string", "description": "Optional reference date, defaults to today" }
                },
                "required": ["birth_date"]
            }),
            age_calculator,
        ),
    ]
}

// ============================================================================
// bmi_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct BmiParams {
    weight_kg: f64,
    height_cm: f64,
}

fn bmi_calculator(params: BmiParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let h = params.height_cm / 100.0;
    let bmi = params.weight_kg / (h * h);
    // NaN falls through to the last band.
    let category = if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    };
    let ideal_min = round_half_up(18.5 * h * h);
    let ideal_max = round_half_up(24.9 * h * h);

    Ok(json!({
        "bmi": rounded(bmi, 1),
        "category": category,
        "ideal_weight_range": format!("{}-{} kg", fmt_number(ideal_min), fmt_number(ideal_max)),
        "height_cm": number(params.height_cm),
        "weight_kg": number(params.weight_kg),
    }))
}

// ============================================================================
// compound_interest
// ============================================================================

#[derive(Debug, Deserialize)]
struct CompoundParams {
    principal: f64,
    rate_percent: f64,
    years: f64,
    #[serde(default = "default_compounds")]
    compounds_per_year: f64,
}

fn default_compounds() -> f64 {
    12.0
}

fn compound_interest(params: CompoundParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let CompoundParams { principal, rate_percent, years, compounds_per_year: n } = params;
    let r = rate_percent / 100.0;
    let balance_after = |periods: f64| principal * (1.0 + r / n).powf(n * periods);

    let amount = balance_after(years);
    let interest = amount - principal;
    let breakdown: Vec<Value> = (1..=capped_count(years, MAX_BREAKDOWN_YEARS))
        .map(|year| json!({ "year": year, "balance": rounded(balance_after(year as f64), 2) }))
        .collect();

    Ok(json!({
        "principal": number(principal),
        "rate_percent": number(rate_percent),
        "years": number(years),
        "compounds_per_year": number(n),
        "final_amount": rounded(amount, 2),
        "total_interest": rounded(interest, 2),
        "interest_earned_percent": number(round_half_up(interest / principal * 10_000.0) / 100.0),
        "yearly_breakdown": breakdown,
    }))
}

// ============================================================================
// loan_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoanParams {
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
}

fn loan_calculator(params: LoanParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let r = params.annual_rate_percent / 100.0 / 12.0;
    let n = params.years * 12.0;
    let monthly = if r == 0.0 {
        params.principal / n
    } else {
        let growth = (1.0 + r).powf(n);
        params.principal * r * growth / (growth - 1.0)
    };
    let total = monthly * n;

    Ok(json!({
        "principal": number(params.principal),
        "annual_rate_percent": number(params.annual_rate_percent),
        "years": number(params.years),
        "monthly_payment": rounded(monthly, 2),
        "total_payment": rounded(total, 2),
        "total_interest": rounded(total - params.principal, 2),
        "total_months": number(n),
    }))
}

// ============================================================================
// tip_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct TipParams {
    bill_amount: f64,
    #[serde(default = "default_tip_percent")]
    tip_percent: f64,
    #[serde(default = "default_people")]
    people: f64,
}

fn default_tip_percent() -> f64 {
    18.0
}

fn default_people() -> f64 {
    1.0
}

fn tip_calculator(params: TipParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let tip = params.bill_amount * params.tip_percent / 100.0;
    let total = params.bill_amount + tip;

    Ok(json!({
        "bill_amount": number(params.bill_amount),
        "tip_percent": number(params.tip_percent),
        "people": number(params.people),
        "tip_amount": rounded(tip, 2),
        "total": rounded(total, 2),
        "per_person": rounded(total / params.people, 2),
        "tip_per_person": rounded(tip / params.people, 2),
    }))
}

// ============================================================================
// tax_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct TaxParams {
    amount: f64,
    tax_rate_percent: f64,
    #[serde(default = "default_tax_type")]
    tax_type: String,
}

fn default_tax_type() -> String {
    "add_tax".to_string()
}

/// Any `tax_type` other than `add_tax` extracts tax from a gross amount.
fn tax_calculator(params: TaxParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let rate = params.tax_rate_percent;
    if params.tax_type == "add_tax" {
        let tax = params.amount * rate / 100.0;
        return Ok(json!({
            "pre_tax": number(params.amount),
            "tax_rate_percent": number(rate),
            "tax_amount": rounded(tax, 2),
            "total": rounded(params.amount + tax, 2),
        }));
    }

    let pre_tax = params.amount / (1.0 + rate / 100.0);
    Ok(json!({
        "total": number(params.amount),
        "tax_rate_percent": number(rate),
        "tax_amount": rounded(params.amount - pre_tax, 2),
        "pre_tax": rounded(pre_tax, 2),
    }))
}

// ============================================================================
// age_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct AgeParams {
    birth_date: String,
    reference_date: Option<String>,
}

fn age_calculator(params: AgeParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let now = ctx.now();
    let birth = parse_date(&params.birth_date, now);
    let reference = match params.reference_date.as_deref() {
        Some(date) if !date.is_empty() => parse_date(date, now),
        _ => Some(now),
    };
    let (Some(birth), Some(reference)) = (birth, reference) else {
        return Ok(json!({ "error": "Invalid date" }));
    };

    let mut years = reference.year() - birth.year();
    let mut months = reference.month() as i32 - birth.month() as i32;
    let mut days = reference.day() as i32 - birth.day() as i32;
    // Borrowing a month counts as thirty days.
    if days < 0 {
        months -= 1;
        days += 30;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let total_days = (millis_between(&birth, &reference) / MS_PER_DAY).floor();
    let next = next_birthday(&birth, &reference);
    let days_to_next = (millis_between(&reference, &next) / MS_PER_DAY).floor();

    Ok(json!({
        "years": years,
        "months": months,
        "days": days,
        "total_days_lived": number(total_days),
        "days_to_next_birthday": number(days_to_next),
    }))
}

/// Midnight of the first birthday on or after `reference`. A 29 February
/// birthday in a common year falls on 1 March.
fn next_birthday(birth: &DateTime<Utc>, reference: &DateTime<Utc>) -> DateTime<Utc> {
    let anniversary = |year: i32, month: u32, day: u32| {
        NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(*reference)
    };

    let this_year = anniversary(reference.year(), birth.month(), birth.day());
    if this_year >= *reference {
        return this_year;
    }
    anniversary(reference.year() + 1, this_year.month(), this_year.day())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::ok;

    #[test]
    fn test_bmi() {
        let out = ok("bmi_calculator", json!({ "weight_kg": 70, "height_cm": 175 }));
        assert_eq!(out["bmi"], 22.9);
        assert_eq!(out["category"], "Normal weight");
        assert_eq!(out["ideal_weight_range"], "57-76 kg");
    }

    #[test]
    fn test_compound_interest() {
        let out = ok(
            "compound_interest",
            json!({ "principal": 1000, "rate_percent": 10, "years": 2, "compounds_per_year": 1 }),
        );
        assert_eq!(out["final_amount"], 1210);
        assert_eq!(out["total_interest"], 210);
        assert_eq!(out["interest_earned_percent"], 21);
        assert_eq!(
            out["yearly_breakdown"],
            json!([{ "year": 1, "balance": 1100 }, { "year": 2, "balance": 1210 }])
        );
    }

    #[test]
    fn test_compound_breakdown_capped() {
        let out = ok(
            "compound_interest",
            json!({ "principal": 100, "rate_percent": 1, "years": 45 }),
        );
        assert_eq!(out["yearly_breakdown"].as_array().unwrap().len(), 30);
        assert_eq!(out["compounds_per_year"], 12);
    }

    #[test]
    fn test_loan() {
        let out = ok(
            "loan_calculator",
            json!({ "principal": 12000, "annual_rate_percent": 0, "years": 1 }),
        );
        assert_eq!(out["monthly_payment"], 1000);
        assert_eq!(out["total_interest"], 0);

        let out = ok(
            "loan_calculator",
            json!({ "principal": 200000, "annual_rate_percent": 6, "years": 30 }),
        );
        assert_eq!(out["monthly_payment"], 1199.1);
        assert_eq!(out["total_months"], 360);
    }

    #[test]
    fn test_tip_split() {
        let out = ok("tip_calculator", json!({ "bill_amount": 100, "people": 4 }));
        assert_eq!(out["tip_amount"], 18);
        assert_eq!(out["total"], 118);
        assert_eq!(out["per_person"], 29.5);
        assert_eq!(out["tip_per_person"], 4.5);
    }

    #[test]
    fn test_tax_both_directions() {
        let out = ok("tax_calculator", json!({ "amount": 100, "tax_rate_percent": 20 }));
        assert_eq!(out["total"], 120);
        assert_eq!(out["tax_amount"], 20);

        let out = ok(
            "tax_calculator",
            json!({ "amount": 120, "tax_rate_percent": 20, "tax_type": "remove_tax" }),
        );
        assert_eq!(out["pre_tax"], 100);
        assert_eq!(out["tax_amount"], 20);
    }

    #[test]
    fn test_age_against_reference() {
        let out = ok(
            "age_calculator",
            json!({ "birth_date": "1990-06-20", "reference_date": "2024-01-15" }),
        );
        assert_eq!(out["years"], 33);
        assert_eq!(out["months"], 6);
        assert_eq!(out["days"], 25);
        assert_eq!(out["days_to_next_birthday"], 157);
    }

    #[test]
    fn test_age_defaults_to_clock() {
        // The test clock reads 2024-01-15 10:30 UTC.
        let out = ok("age_calculator", json!({ "birth_date": "2000-01-16" }));
        assert_eq!(out["years"], 23);
        assert_eq!(out["days_to_next_birthday"], 0);
    }

    #[test]
    fn test_age_invalid_date() {
        let out = ok("age_calculator", json!({ "birth_date": "someday" }));
        assert_eq!(out["error"], "Invalid date");
    }

    #[test]
    fn test_leap_day_birthday() {
        let birth = parse_date("2000-02-29", Utc::now()).unwrap();
        let reference = parse_date("2023-03-05", Utc::now()).unwrap();
        let next = next_birthday(&birth, &reference);
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
