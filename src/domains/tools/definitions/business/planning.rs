//! Planning templates.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;

/// Rough page estimate per outline section.
const PAGES_PER_SECTION: usize = 2;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "generate_business_plan_outline",
            CATEGORY,
            "Generate a business plan outline for any industry",
            json!({
                "type": "object",
                "properties": {
                    "business_name": { "type": "string" },
                    "industry": { "type": "string" },
                    "business_type": {
                        "type": "string",
                        "enum": ["startup", "small_business", "enterprise", "nonprofit"]
                    }
                },
                "required": ["business_name", "industry"]
            }),
            generate_business_plan_outline,
        ),
        ToolDefinition::new(
            "swot_template",
            CATEGORY,
            "Generate a SWOT analysis template for a business",
            json!({
                "type": "object",
                "properties": {
                    "business_name": { "type": "string" },
                    "industry": { "type": "string" }
                },
                "required": ["business_name"]
            }),
            swot_template,
        ),
    ]
}

// ============================================================================
// generate_business_plan_outline
// ============================================================================

fn default_business_type() -> String {
    "startup".to_string()
}

#[derive(Debug, Deserialize)]
struct PlanParams {
    business_name: String,
    industry: String,
    #[serde(default = "default_business_type")]
    business_type: String,
}

fn generate_business_plan_outline(params: PlanParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let market_overview = format!("{} industry overview", params.industry);
    let sections: Vec<(&str, Vec<&str>)> = vec![
        (
            "1. Executive Summary",
            vec![
                "Business description",
                "Mission statement",
                "Products/services overview",
                "Financial highlights",
                "Funding requirements",
            ],
        ),
        (
            "2. Company Overview",
            vec!["Business history", "Legal structure", "Location and facilities", "Team overview"],
        ),
        (
            "3. Market Analysis",
            vec![
                market_overview.as_str(),
                "Target market definition",
                "Market size (TAM/SAM/SOM)",
                "Competitor analysis",
                "Market trends",
            ],
        ),
        (
            "4. Products & Services",
            vec![
                "Product/service description",
                "Unique value proposition",
                "Pricing strategy",
                "Intellectual property",
            ],
        ),
        (
            "5. Marketing Strategy",
            vec![
                "Customer acquisition channels",
                "Brand positioning",
                "Digital marketing plan",
                "Sales strategy",
            ],
        ),
        (
            "6. Operations Plan",
            vec![
                "Day-to-day operations",
                "Supply chain",
                "Technology infrastructure",
                "Key partnerships",
            ],
        ),
        (
            "7. Financial Projections",
            vec![
                "Revenue model",
                "3-year projections",
                "Break-even analysis",
                "Funding needs & use of funds",
            ],
        ),
        (
            "8. Risk Analysis",
            vec!["Key risks identified", "Mitigation strategies", "Contingency plans"],
        ),
    ];

    let outline: Vec<Value> = sections
        .iter()
        .map(|(section, points)| json!({ "section": section, "points": points }))
        .collect();

    Ok(json!({
        "business_name": params.business_name,
        "industry": params.industry,
        "business_type": params.business_type,
        "outline": outline,
        "estimated_pages": sections.len() * PAGES_PER_SECTION,
    }))
}

// ============================================================================
// swot_template
// ============================================================================

fn default_industry() -> String {
    "your industry".to_string()
}

#[derive(Debug, Deserialize)]
struct SwotParams {
    business_name: String,
    #[serde(default = "default_industry")]
    industry: String,
}

fn swot_template(params: SwotParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    Ok(json!({
        "business": params.business_name,
        "swot": {
            "strengths": {
                "label": "Strengths (Internal, Positive)",
                "prompts": [
                    "What does the company do well?",
                    "Unique resources or capabilities?",
                    "Strong brand/reputation?",
                    "Patent or proprietary technology?",
                    "Cost advantages?"
                ]
            },
            "weaknesses": {
                "label": "Weaknesses (Internal, Negative)",
                "prompts": [
                    "What could be improved?",
                    "Limited resources?",
                    "Gaps in expertise?",
                    "Negative brand perception?",
                    "High operational costs?"
                ]
            },
            "opportunities": {
                "label": "Opportunities (External, Positive)",
                "prompts": [
                    format!("Emerging trends in {}?", params.industry),
                    "New market segments?",
                    "Technology changes?",
                    "Competitor vulnerabilities?",
                    "Regulatory changes?"
                ]
            },
            "threats": {
                "label": "Threats (External, Negative)",
                "prompts": [
                    "New competitors?",
                    "Changing customer needs?",
                    "Economic downturns?",
                    "Supply chain risks?",
                    "Regulatory challenges?"
                ]
            }
        }
    }))
}
