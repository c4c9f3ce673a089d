//! Randomized and derived fixtures: UUIDs, mock records and color palettes.

use chrono::Duration;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Builder;

use super::CATEGORY;
use super::super::web::parse_hex;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{capped_count, iso_date, round_half_up};

const MAX_UUIDS: usize = 50;
const MAX_MOCK_RECORDS: usize = 100;

const FIRST_NAMES: [&str; 10] = [
    "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Hank", "Iris", "Jack",
];
const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson", "Martinez",
];
const COMPANIES: [&str; 7] = [
    "Acme Corp",
    "Initech",
    "Globex",
    "Hooli",
    "Pied Piper",
    "Vandelay Industries",
    "Sterling Cooper",
];
const PRODUCTS: [&str; 10] = [
    "Laptop", "Phone", "Tablet", "Monitor", "Keyboard", "Mouse", "Headphones", "Webcam", "Speaker", "Printer",
];
const STREETS: [&str; 8] = [
    "Main St", "Oak Ave", "Park Rd", "Elm St", "Maple Dr", "Cedar Ln", "Pine Way", "Lake Blvd",
];
const CITIES: [&str; 8] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
];
const STATES: [&str; 8] = ["NY", "CA", "IL", "TX", "AZ", "PA", "TX", "CA"];
const ORDER_STATUSES: [&str; 4] = ["pending", "shipped", "delivered", "cancelled"];
const INDUSTRIES: [&str; 4] = ["Tech", "Finance", "Healthcare", "Retail"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "generate_uuid",
            CATEGORY,
            "Generate UUIDs in v4 format",
            json!({
                "type": "object",
                "properties": {
                    "count": { "type": "number", "default": 1 }
                }
            }),
            generate_uuid,
        ),
        ToolDefinition::new(
            "generate_mock_data",
            CATEGORY,
            "Generate realistic mock/test data",
            json!({
                "type": "object",
                "properties": {
                    "type": { "type": "string", "enum": ["users", "products", "orders", "companies", "addresses"] },
                    "count": { "type": "number", "default": 5 }
                },
                "required": ["type"]
            }),
            generate_mock_data,
        ),
        ToolDefinition::new(
            "color_palette_generator",
            CATEGORY,
            "Generate color palettes from a base color",
            json!({
                "type": "object",
                "properties": {
                    "base_hex": { "type": "string", "description": "Base color in hex e.g. #3B82F6" },
                    "palette_type": {
                        "type": "string",
                        "enum": ["monochromatic", "complementary", "triadic", "analogous"],
                        "default": "monochromatic"
                    }
                },
                "required": ["base_hex"]
            }),
            color_palette_generator,
        ),
    ]
}

// ============================================================================
// generate_uuid
// ============================================================================

fn one() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct UuidParams {
    #[serde(default = "one")]
    count: f64,
}

/// Version 4 UUIDs drawn from the call's random source.
fn generate_uuid(params: UuidParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let uuids: Vec<String> = (0..capped_count(params.count, MAX_UUIDS))
        .map(|_| {
            let mut bytes = [0u8; 16];
            ctx.fill_bytes(&mut bytes);
            Builder::from_random_bytes(bytes).into_uuid().to_string()
        })
        .collect();

    Ok(json!({
        "count": uuids.len(),
        "uuids": uuids,
    }))
}

// ============================================================================
// generate_mock_data
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MockKind {
    Users,
    Products,
    Orders,
    Companies,
    Addresses,
}

impl MockKind {
    fn label(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Companies => "companies",
            Self::Addresses => "addresses",
        }
    }
}

fn default_mock_count() -> f64 {
    5.0
}

#[derive(Debug, Deserialize)]
struct MockParams {
    #[serde(rename = "type")]
    kind: MockKind,
    #[serde(default = "default_mock_count")]
    count: f64,
}

fn generate_mock_data(params: MockParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let data = (0..capped_count(params.count, MAX_MOCK_RECORDS))
        .map(|_| mock_record(params.kind, ctx))
        .collect::<ToolResult<Vec<Value>>>()?;

    Ok(json!({
        "type": params.kind.label(),
        "data": data,
    }))
}

fn full_name(ctx: &mut ToolContext) -> String {
    format!("{} {}", ctx.pick(&FIRST_NAMES), ctx.pick(&LAST_NAMES))
}

/// Numeric ranges are half-open, `[min, max)`.
fn mock_record(kind: MockKind, ctx: &mut ToolContext) -> ToolResult<Value> {
    let record = match kind {
        MockKind::Users => json!({
            "id": ctx.int_between(1000, 9999),
            "name": full_name(ctx),
            "email": format!(
                "{}.{}@email.com",
                ctx.pick(&FIRST_NAMES).to_lowercase(),
                ctx.pick(&LAST_NAMES).to_lowercase()
            ),
            "age": ctx.int_between(18, 65),
            "company": ctx.pick(&COMPANIES),
            "phone": format!(
                "+1-{}-{}-{}",
                ctx.int_between(200, 999),
                ctx.int_between(100, 999),
                ctx.int_between(1000, 9999)
            ),
        }),
        MockKind::Products => json!({
            "id": ctx.int_between(100, 999),
            "name": ctx.pick(&PRODUCTS),
            "price": ctx.int_between(10, 999) as f64 + 0.99,
            "sku": format!("SKU-{}", ctx.int_between(10000, 99999)),
            "stock": ctx.int_between(0, 500),
            "category": "Electronics",
        }),
        MockKind::Orders => {
            let id = format!("ORD-{}", ctx.int_between(10000, 99999));
            let customer = full_name(ctx);
            let total = ctx.int_between(20, 2000) as f64 + 0.99;
            let status = ctx.pick(&ORDER_STATUSES);
            let placed = ctx
                .now()
                .checked_sub_signed(Duration::days(ctx.int_between(0, 30)))
                .ok_or_else(|| ToolError::execution_failed("Invalid time value"))?;
            json!({
                "id": id,
                "customer": customer,
                "total": total,
                "status": status,
                "date": iso_date(&placed),
            })
        }
        MockKind::Companies => json!({
            "name": ctx.pick(&COMPANIES),
            "industry": ctx.pick(&INDUSTRIES),
            "employees": ctx.int_between(10, 10000),
            "revenue": format!("${}M", ctx.int_between(1, 500)),
            "founded": ctx.int_between(1980, 2020),
        }),
        MockKind::Addresses => json!({
            "street": format!("{} {}", ctx.int_between(1, 9999), ctx.pick(&STREETS)),
            "city": ctx.pick(&CITIES),
            "state": ctx.pick(&STATES),
            "zip": ctx.int_between(10000, 99999).to_string(),
            "country": "USA",
        }),
    };
    Ok(record)
}

// ============================================================================
// color_palette_generator
// ============================================================================

fn default_palette_type() -> String {
    "monochromatic".to_string()
}

#[derive(Debug, Deserialize)]
struct PaletteParams {
    base_hex: String,
    #[serde(default = "default_palette_type")]
    palette_type: String,
}

/// Channel arithmetic on RGB. Unrecognized palette types get the analogous
/// scheme.
fn color_palette_generator(params: PaletteParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let (r, g, b) = parse_hex(&params.base_hex)?;
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    let base = params.base_hex.to_uppercase();
    let tint = |c: f64, amount: f64| c + (255.0 - c) * amount;

    let palette: Vec<(&str, String)> = match params.palette_type.as_str() {
        "monochromatic" => vec![
            ("Darkest", to_hex(r * 0.3, g * 0.3, b * 0.3)),
            ("Dark", to_hex(r * 0.6, g * 0.6, b * 0.6)),
            ("Base", base),
            ("Light", to_hex(tint(r, 0.4), tint(g, 0.4), tint(b, 0.4))),
            ("Lightest", to_hex(tint(r, 0.8), tint(g, 0.8), tint(b, 0.8))),
        ],
        "complementary" => vec![
            ("Primary", base),
            ("Complement", to_hex(255.0 - r, 255.0 - g, 255.0 - b)),
        ],
        "triadic" => vec![
            ("Color 1", base),
            ("Color 2", to_hex(g, b, r)),
            ("Color 3", to_hex(b, r, g)),
        ],
        _ => vec![
            ("Analogous 1", to_hex(r, g * 0.8, b * 1.2)),
            ("Base", base),
            ("Analogous 2", to_hex(r * 1.2, g, b * 0.8)),
        ],
    };
    let palette: Vec<Value> = palette
        .into_iter()
        .map(|(name, hex)| json!({ "name": name, "hex": hex }))
        .collect();

    Ok(json!({
        "base_color": params.base_hex,
        "palette_type": params.palette_type,
        "palette": palette,
    }))
}

/// `#RRGGBB` with each channel rounded and clamped to a byte.
fn to_hex(r: f64, g: f64, b: f64) -> String {
    let byte = |c: f64| round_half_up(c).clamp(0.0, 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}", byte(r), byte(g), byte(b))
}

// ============================================================================
// Tests
// ============================================================================
