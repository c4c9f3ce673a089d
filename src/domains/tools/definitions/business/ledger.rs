//! Invoices, cash flow and budgets: tools over lists of line items.

use std::cmp::Ordering;

use chrono::Duration;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{CATEGORY, percent_label, ratio_percent};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{field_f64, iso_date, number, round_to, rounded};

/// Digits of the millisecond clock kept in an invoice number.
const INVOICE_NUMBER_DIGITS: usize = 8;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "invoice_generator",
            CATEGORY,
            "Generate invoice data structure",
            json!({
                "type": "object",
                "properties": {
                    "company_name": { "type": "string" },
                    "client_name": { "type": "string" },
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "quantity": { "type": "number" },
                                "price": { "type": "number" }
                            }
                        }
                    },
                    "tax_rate": { "type": "number", "default": 0 },
                    "currency": { "type": "string", "default": "USD" },
                    "due_days": { "type": "number", "default": 30 }
                },
                "required": ["company_name", "client_name", "items"]
            }),
            invoice_generator,
        ),
        ToolDefinition::new(
            "cash_flow_analyzer",
            CATEGORY,
            "Analyze cash flow from income and expense lists",
            json!({
                "type": "object",
                "properties": {
                    "income": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": { "name": { "type": "string" }, "amount": { "type": "number" } }
                        }
                    },
                    "expenses": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": { "name": { "type": "string" }, "amount": { "type": "number" } }
                        }
                    }
                },
                "required": ["income", "expenses"]
            }),
            cash_flow_analyzer,
        ),
        ToolDefinition::new(
            "budget_planner",
            CATEGORY,
            "Create a budget plan using 50/30/20 or custom rules",
            json!({
                "type": "object",
                "properties": {
                    "monthly_income": { "type": "number" },
                    "rule": { "type": "string", "enum": ["50-30-20", "70-20-10", "custom"], "default": "50-30-20" },
                    "custom_splits": { "type": "array", "items": { "type": "object" }, "description": "[{name, percent}]" }
                },
                "required": ["monthly_income"]
            }),
            budget_planner,
        ),
    ]
}

/// Copy of a line item with one extra field set.
fn with_field(item: &Map<String, Value>, key: &str, value: Value) -> Value {
    let mut copy = item.clone();
    copy.insert(key.to_string(), value);
    Value::Object(copy)
}

// ============================================================================
// invoice_generator
// ============================================================================

fn default_currency() -> String {
    "USD".to_string()
}

fn default_due_days() -> f64 {
    30.0
}

#[derive(Debug, Deserialize)]
struct InvoiceParams {
    company_name: String,
    client_name: String,
    items: Vec<Map<String, Value>>,
    #[serde(default)]
    tax_rate: f64,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default = "default_due_days")]
    due_days: f64,
}

/// Dated from the call's clock; the invoice number is the tail of its
/// millisecond timestamp.
fn invoice_generator(params: InvoiceParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let today = ctx.now();
    let stamp = today.timestamp_millis().to_string();
    let invoice_number = format!("INV-{}", &stamp[stamp.len().saturating_sub(INVOICE_NUMBER_DIGITS)..]);

    let due = Some(params.due_days.trunc())
        .filter(|days| days.is_finite() && days.abs() < 1e8)
        .and_then(|days| today.checked_add_signed(Duration::days(days as i64)))
        .ok_or_else(|| ToolError::execution_failed("Invalid time value"))?;

    let line_total = |item: &Map<String, Value>| field_f64(item, "quantity") * field_f64(item, "price");
    let subtotal: f64 = params.items.iter().map(line_total).sum();
    let tax = subtotal * params.tax_rate / 100.0;
    let items: Vec<Value> = params
        .items
        .iter()
        .map(|item| with_field(item, "total", rounded(line_total(item), 2)))
        .collect();

    Ok(json!({
        "invoice_number": invoice_number,
        "company": params.company_name,
        "client": params.client_name,
        "date": iso_date(&today),
        "due_date": iso_date(&due),
        "items": items,
        "subtotal": rounded(subtotal, 2),
        "tax_rate": number(params.tax_rate),
        "tax_amount": rounded(tax, 2),
        "total": rounded(subtotal + tax, 2),
        "currency": params.currency,
        "status": "draft",
    }))
}

// ============================================================================
// cash_flow_analyzer
// ============================================================================

#[derive(Debug, Deserialize)]
struct CashFlowParams {
    income: Vec<Map<String, Value>>,
    expenses: Vec<Map<String, Value>>,
}

fn cash_flow_analyzer(params: CashFlowParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let amount = |entry: &Map<String, Value>| field_f64(entry, "amount");
    let total_income: f64 = params.income.iter().map(amount).sum();
    let total_expenses: f64 = params.expenses.iter().map(amount).sum();
    let net = total_income - total_expenses;

    // First entry among the largest amounts.
    let largest = params.expenses.iter().fold(None::<&Map<String, Value>>, |best, entry| match best {
        Some(current) if amount(entry).partial_cmp(&amount(current)) != Some(Ordering::Greater) => {
            Some(current)
        }
        _ => Some(entry),
    });

    let breakdown = |entries: &[Map<String, Value>], total: f64| -> Vec<Value> {
        entries
            .iter()
            .map(|entry| with_field(entry, "percent", number(ratio_percent(amount(entry) / total))))
            .collect()
    };

    let mut out = Map::new();
    out.insert("total_income".into(), rounded(total_income, 2));
    out.insert("total_expenses".into(), rounded(total_expenses, 2));
    out.insert("net_cash_flow".into(), rounded(net, 2));
    out.insert(
        "status".into(),
        json!(if net >= 0.0 { "Positive" } else { "Negative" }),
    );
    out.insert(
        "expense_ratio".into(),
        json!(percent_label(ratio_percent(total_expenses / total_income))),
    );
    out.insert("savings_rate".into(), json!(percent_label(ratio_percent(net / total_income))));
    if let Some(entry) = largest {
        out.insert("largest_expense".into(), Value::Object(entry.clone()));
    }
    out.insert("income_breakdown".into(), json!(breakdown(params.income.as_slice(), total_income)));
    out.insert("expense_breakdown".into(), json!(breakdown(params.expenses.as_slice(), total_expenses)));
    Ok(Value::Object(out))
}

// ============================================================================
// budget_planner
// ============================================================================

fn default_rule() -> String {
    "50-30-20".to_string()
}

#[derive(Debug, Deserialize)]
struct BudgetParams {
    monthly_income: f64,
    #[serde(default = "default_rule")]
    rule: String,
    custom_splits: Option<Vec<Map<String, Value>>>,
}

fn preset(splits: &[(&str, f64)]) -> Vec<Map<String, Value>> {
    splits
        .iter()
        .map(|(name, percent)| {
            let mut split = Map::new();
            split.insert("name".into(), json!(name));
            split.insert("percent".into(), number(*percent));
            split
        })
        .collect()
}

/// Any rule other than the two presets uses `custom_splits`.
fn budget_planner(params: BudgetParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let splits = match params.rule.as_str() {
        "50-30-20" => preset(&[("Needs", 50.0), ("Wants", 30.0), ("Savings", 20.0)]),
        "70-20-10" => preset(&[("Living", 70.0), ("Savings", 20.0), ("Debt/Giving", 10.0)]),
        _ => params.custom_splits.unwrap_or_default(),
    };

    let allocations: Vec<(Map<String, Value>, f64)> = splits
        .into_iter()
        .map(|split| {
            let amount = round_to(params.monthly_income * field_f64(&split, "percent") / 100.0, 2);
            (split, amount)
        })
        .collect();

    let annual_savings = allocations
        .iter()
        .find(|(split, _)| {
            split
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains("sav"))
        })
        .map(|(_, amount)| amount * 12.0)
        .filter(|annual| annual.is_finite() && *annual != 0.0)
        .map_or_else(|| json!("N/A"), number);

    let budget: Vec<Value> = allocations
        .iter()
        .map(|(split, amount)| with_field(split, "amount", number(*amount)))
        .collect();

    Ok(json!({
        "monthly_income": number(params.monthly_income),
        "rule": params.rule,
        "budget": budget,
        "annual_income": number(params.monthly_income * 12.0),
        "annual_savings": annual_savings,
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
    fn test_invoice_totals_and_dates() {
        let out = ok(
            "invoice_generator",
            json!({
                "company_name": "Acme",
                "client_name": "Globex",
                "items": [
                    { "name": "Widget", "quantity": 3, "price": 19.99 },
                    { "name": "Setup", "quantity": 1, "price": 50 }
                ],
                "tax_rate": 10
            }),
        );
        assert_eq!(out["invoice_number"], "INV-14600000");
        assert_eq!(out["date"], "2024-01-15");
        assert_eq!(out["due_date"], "2024-02-14");
        assert_eq!(out["items"][0]["total"], 59.97);
        assert_eq!(out["items"][0]["name"], "Widget");
        assert_eq!(out["subtotal"], 109.97);
        assert_eq!(out["tax_amount"], 11.0);
        assert_eq!(out["total"], 120.97);
        assert_eq!(out["currency"], "USD");
        assert_eq!(out["status"], "draft");
    }

    #[test]
    fn test_invoice_requires_items() {
        let err = run("invoice_generator", json!({ "company_name": "A", "client_name": "B" })).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_cash_flow() {
        let out = ok(
            "cash_flow_analyzer",
            json!({
                "income": [{ "name": "Salary", "amount": 4000 }, { "name": "Side", "amount": 1000 }],
                "expenses": [
                    { "name": "Rent", "amount": 1500 },
                    { "name": "Food", "amount": 500 },
                    { "name": "Mortgage", "amount": 1500 }
                ]
            }),
        );
        assert_eq!(out["net_cash_flow"], 1500);
        assert_eq!(out["status"], "Positive");
        assert_eq!(out["expense_ratio"], "70%");
        assert_eq!(out["savings_rate"], "30%");
        assert_eq!(out["largest_expense"]["name"], "Rent");
        assert_eq!(out["income_breakdown"][0]["percent"], 80);
        assert_eq!(out["expense_breakdown"][1]["percent"], 14.29);
    }

    #[test]
    fn test_cash_flow_without_expenses() {
        let out = ok("cash_flow_analyzer", json!({ "income": [], "expenses": [] }));
        assert!(out.get("largest_expense").is_none());
        assert_eq!(out["expense_ratio"], "NaN%");
    }

    #[test]
    fn test_budget_presets() {
        let out = ok("budget_planner", json!({ "monthly_income": 5000 }));
        assert_eq!(out["rule"], "50-30-20");
        assert_eq!(out["budget"][0], json!({ "name": "Needs", "percent": 50, "amount": 2500 }));
        assert_eq!(out["annual_income"], 60000);
        assert_eq!(out["annual_savings"], 12000);

        let out = ok("budget_planner", json!({ "monthly_income": 3000, "rule": "70-20-10" }));
        assert_eq!(out["budget"][2]["name"], "Debt/Giving");
        assert_eq!(out["budget"][2]["amount"], 300);
    }

    #[test]
    fn test_budget_custom_without_savings() {
        let out = ok(
            "budget_planner",
            json!({
                "monthly_income": 1000,
                "rule": "custom",
                "custom_splits": [{ "name": "Rent", "percent": 60 }, { "name": "Fun", "percent": 40 }]
            }),
        );
        assert_eq!(out["budget"][0]["amount"], 600);
        assert_eq!(out["annual_savings"], "N/A");
    }
}
