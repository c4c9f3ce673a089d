//! Single-formula financial metrics.

use serde::Deserialize;
use serde_json::{Value, json};

use super::{CATEGORY, percent_label, ratio_percent};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{fmt_number, number, round_to, rounded};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "profit_margin_calculator",
            CATEGORY,
            "Calculate profit margin, markup, and break-even",
            json!({
                "type": "object",
                "properties": {
                    "cost": { "type": "number" },
                    "revenue": { "type": "number" },
                    "fixed_costs": { "type": "number", "default": 0 },
                    "variable_cost_per_unit": { "type": "number", "default": 0 },
                    "units_sold": { "type": "number", "default": 1 }
                },
                "required": ["cost", "revenue"]
            }),
            profit_margin_calculator,
        ),
        ToolDefinition::new(
            "npv_calculator",
            CATEGORY,
            "Calculate Net Present Value (NPV) of cash flows",
            json!({
                "type": "object",
                "properties": {
                    "initial_investment": { "type": "number" },
                    "cash_flows": { "type": "array", "items": { "type": "number" } },
                    "discount_rate_percent": { "type": "number" }
                },
                "required": ["initial_investment", "cash_flows", "discount_rate_percent"]
            }),
            npv_calculator,
        ),
        ToolDefinition::new(
            "break_even_analysis",
            CATEGORY,
            "Calculate break-even point for a business",
            json!({
                "type": "object",
                "properties": {
                    "fixed_costs": { "type": "number" },
                    "price_per_unit": { "type": "number" },
                    "variable_cost_per_unit": { "type": "number" }
                },
                "required": ["fixed_costs", "price_per_unit", "variable_cost_per_unit"]
            }),
            break_even_analysis,
        ),
        ToolDefinition::new(
            "salary_to_hourly",
            CATEGORY,
            "Convert salary to hourly rate and vice versa",
            json!({
                "type": "object",
                "properties": {
                    "amount": { "type": "number" },
                    "from": {
                        "type": "string",
                        "enum": ["hourly", "daily", "weekly", "biweekly", "monthly", "annually"]
                    },
                    "hours_per_week": { "type": "number", "default": 40 },
                    "weeks_per_year": { "type": "number", "default": 52 }
                },
                "required": ["amount", "from"]
            }),
            salary_to_hourly,
        ),
        ToolDefinition::new(
            "stock_return_calculator",
            CATEGORY,
            "Calculate stock investment returns",
            json!({
                "type": "object",
                "properties": {
                    "buy_price": { "type": "number" },
                    "sell_price": { "type": "number" },
                    "shares": { "type": "number" },
                    "dividends_received": { "type": "number", "default": 0 },
                    "buy_commission": { "type": "number", "default": 0 },
                    "sell_commission": { "type": "number", "default": 0 }
                },
                "required": ["buy_price", "sell_price", "shares"]
            }),
            stock_return_calculator,
        ),
        ToolDefinition::new(
            "kpi_tracker",
            CATEGORY,
            "Calculate and track KPIs from business metrics",
            json!({
                "type": "object",
                "properties": {
                    "revenue": { "type": "number" },
                    "customers": { "type": "number" },
                    "new_customers": { "type": "number" },
                    "lost_customers": { "type": "number" },
                    "marketing_spend": { "type": "number" },
                    "support_tickets": { "type": "number" },
                    "resolved_tickets": { "type": "number" }
                },
                "required": ["revenue", "customers"]
            }),
            kpi_tracker,
        ),
        ToolDefinition::new(
            "roi_calculator",
            CATEGORY,
            "Calculate ROI for any investment",
            json!({
                "type": "object",
                "properties": {
                    "investment": { "type": "number" },
                    "returns": { "type": "number" },
                    "time_period_months": { "type": "number", "default": 12 }
                },
                "required": ["investment", "returns"]
            }),
            roi_calculator,
        ),
    ]
}

fn one() -> f64 {
    1.0
}

// ============================================================================
// profit_margin_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProfitMarginParams {
    cost: f64,
    revenue: f64,
    #[serde(default)]
    fixed_costs: f64,
    #[serde(default)]
    variable_cost_per_unit: f64,
    #[serde(default = "one")]
    units_sold: f64,
}

fn profit_margin_calculator(params: ProfitMarginParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let ProfitMarginParams { cost, revenue, fixed_costs, variable_cost_per_unit, units_sold } = params;
    let gross_profit = revenue - cost;
    let net_profit = gross_profit - fixed_costs;

    let break_even_units = if variable_cost_per_unit > 0.0 {
        (fixed_costs / (revenue / units_sold - variable_cost_per_unit)).ceil()
    } else {
        0.0
    };
    let break_even = if break_even_units == 0.0 || break_even_units.is_nan() {
        json!("N/A (no variable costs provided)")
    } else {
        number(break_even_units)
    };

    Ok(json!({
        "revenue": number(revenue),
        "cost": number(cost),
        "gross_profit": rounded(gross_profit, 2),
        "gross_margin_percent": rounded(gross_profit / revenue * 100.0, 2),
        "markup_percent": rounded(gross_profit / cost * 100.0, 2),
        "net_profit": rounded(net_profit, 2),
        "net_margin_percent": rounded(net_profit / revenue * 100.0, 2),
        "break_even_units": break_even,
        "roi_percent": number(ratio_percent((revenue - cost) / cost)),
    }))
}

// ============================================================================
// npv_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct NpvParams {
    initial_investment: f64,
    cash_flows: Vec<f64>,
    discount_rate_percent: f64,
}

/// Cash flows are discounted from the end of year one.
fn npv_calculator(params: NpvParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let rate = params.discount_rate_percent / 100.0;
    let present_values: Vec<f64> = params
        .cash_flows
        .iter()
        .zip(1..)
        .map(|(cash_flow, year)| cash_flow / (1.0 + rate).powi(year))
        .collect();
    let total_pv: f64 = present_values.iter().sum();
    let npv = total_pv - params.initial_investment;

    let schedule: Vec<Value> = params
        .cash_flows
        .iter()
        .zip(&present_values)
        .enumerate()
        .map(|(i, (cash_flow, pv))| {
            json!({ "year": i + 1, "cash_flow": number(*cash_flow), "present_value": rounded(*pv, 2) })
        })
        .collect();

    Ok(json!({
        "initial_investment": number(params.initial_investment),
        "discount_rate_percent": number(params.discount_rate_percent),
        "cash_flows": schedule,
        "total_pv": rounded(total_pv, 2),
        "npv": rounded(npv, 2),
        "decision": if npv > 0.0 { "Accept (positive NPV)" } else { "Reject (negative NPV)" },
    }))
}

// ============================================================================
// break_even_analysis
// ============================================================================

#[derive(Debug, Deserialize)]
struct BreakEvenParams {
    fixed_costs: f64,
    price_per_unit: f64,
    variable_cost_per_unit: f64,
}

fn break_even_analysis(params: BreakEvenParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let contribution_margin = params.price_per_unit - params.variable_cost_per_unit;
    let units = params.fixed_costs / contribution_margin;
    let margin_ratio = contribution_margin / params.price_per_unit * 100.0;

    Ok(json!({
        "fixed_costs": number(params.fixed_costs),
        "price_per_unit": number(params.price_per_unit),
        "variable_cost_per_unit": number(params.variable_cost_per_unit),
        "contribution_margin": rounded(contribution_margin, 2),
        "break_even_units": number(units.ceil()),
        "break_even_revenue": rounded(units * params.price_per_unit, 2),
        "contribution_margin_ratio": percent_label(round_to(margin_ratio, 2)),
    }))
}

// ============================================================================
// salary_to_hourly
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PayPeriod {
    Hourly,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Annually,
}

impl PayPeriod {
    fn label(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Annually => "annually",
        }
    }
}

fn default_hours_per_week() -> f64 {
    40.0
}

fn default_weeks_per_year() -> f64 {
    52.0
}

#[derive(Debug, Deserialize)]
struct SalaryParams {
    amount: f64,
    from: PayPeriod,
    #[serde(default = "default_hours_per_week")]
    hours_per_week: f64,
    #[serde(default = "default_weeks_per_year")]
    weeks_per_year: f64,
}

/// Days are five per working week; biweekly and monthly periods are fixed
/// at 26 and 12 per year.
fn salary_to_hourly(params: SalaryParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let SalaryParams { amount, from, hours_per_week, weeks_per_year } = params;
    let annual = match from {
        PayPeriod::Hourly => amount * hours_per_week * weeks_per_year,
        PayPeriod::Daily => amount * 5.0 * weeks_per_year,
        PayPeriod::Weekly => amount * weeks_per_year,
        PayPeriod::Biweekly => amount * 26.0,
        PayPeriod::Monthly => amount * 12.0,
        PayPeriod::Annually => amount,
    };

    Ok(json!({
        "input": format!("{} {}", fmt_number(amount), from.label()),
        "hourly": rounded(annual / (hours_per_week * weeks_per_year), 2),
        "daily": rounded(annual / (5.0 * weeks_per_year), 2),
        "weekly": rounded(annual / weeks_per_year, 2),
        "biweekly": rounded(annual / 26.0, 2),
        "monthly": rounded(annual / 12.0, 2),
        "annually": rounded(annual, 2),
    }))
}

// ============================================================================
// stock_return_calculator
// ============================================================================

#[derive(Debug, Deserialize)]
struct StockReturnParams {
    buy_price: f64,
    sell_price: f64,
    shares: f64,
    #[serde(default)]
    dividends_received: f64,
    #[serde(default)]
    buy_commission: f64,
    #[serde(default)]
    sell_commission: f64,
}

fn stock_return_calculator(params: StockReturnParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let cost_basis = params.buy_price * params.shares + params.buy_commission;
    let proceeds = params.sell_price * params.shares - params.sell_commission + params.dividends_received;
    let profit = proceeds - cost_basis;

    Ok(json!({
        "shares": number(params.shares),
        "buy_price": number(params.buy_price),
        "sell_price": number(params.sell_price),
        "cost_basis": rounded(cost_basis, 2),
        "proceeds": rounded(proceeds, 2),
        "profit_loss": rounded(profit, 2),
        "return_percent": rounded(profit / cost_basis * 100.0, 2),
        "outcome": if profit >= 0.0 { "Profit" } else { "Loss" },
    }))
}

// ============================================================================
// kpi_tracker
// ============================================================================

#[derive(Debug, Deserialize)]
struct KpiParams {
    revenue: f64,
    customers: f64,
    #[serde(default)]
    new_customers: f64,
    #[serde(default)]
    lost_customers: f64,
    #[serde(default)]
    marketing_spend: f64,
    #[serde(default)]
    support_tickets: f64,
    #[serde(default)]
    resolved_tickets: f64,
}

/// Lifetime value is ARPU over churn; acquisition cost is marketing spend per
/// new customer.
fn kpi_tracker(params: KpiParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let arpu = params.revenue / params.customers;
    let churn_rate = params.lost_customers / params.customers * 100.0;
    let growth_rate = (params.new_customers - params.lost_customers) / params.customers * 100.0;
    let cac = if params.marketing_spend > 0.0 && params.new_customers > 0.0 {
        params.marketing_spend / params.new_customers
    } else {
        0.0
    };
    let ltv = if churn_rate > 0.0 { arpu / (churn_rate / 100.0) } else { 0.0 };
    let resolution_rate = if params.support_tickets > 0.0 {
        params.resolved_tickets / params.support_tickets * 100.0
    } else {
        0.0
    };

    Ok(json!({
        "revenue": number(params.revenue),
        "customers": number(params.customers),
        "arpu": rounded(arpu, 2),
        "churn_rate_percent": rounded(churn_rate, 2),
        "growth_rate_percent": rounded(growth_rate, 2),
        "customer_acquisition_cost": rounded(cac, 2),
        "lifetime_value": rounded(ltv, 2),
        "ltv_cac_ratio": if cac > 0.0 { rounded(ltv / cac, 2) } else { json!("N/A") },
        "ticket_resolution_rate": percent_label(round_to(resolution_rate, 2)),
    }))
}

// ============================================================================
// roi_calculator
// ============================================================================

fn default_period_months() -> f64 {
    12.0
}

#[derive(Debug, Deserialize)]
struct RoiParams {
    investment: f64,
    returns: f64,
    #[serde(default = "default_period_months")]
    time_period_months: f64,
}

fn roi_calculator(params: RoiParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let profit = params.returns - params.investment;
    let roi = profit / params.investment * 100.0;
    let annualized = roi * (12.0 / params.time_period_months);
    let payback_months = (params.investment / (profit / params.time_period_months)).ceil();

    Ok(json!({
        "investment": number(params.investment),
        "returns": number(params.returns),
        "time_period_months": number(params.time_period_months),
        "profit": rounded(profit, 2),
        "roi_percent": rounded(roi, 2),
        "annualized_roi_percent": rounded(annualized, 2),
        "payback_months": number(payback_months),
    }))
}

// ============================================================================
// Tests
// ============================================================================
