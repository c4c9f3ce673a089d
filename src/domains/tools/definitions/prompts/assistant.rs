//! Prompts addressed to an AI model.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{CATEGORY, bullets, field_text};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;

const DEFAULT_CAPABILITIES: [&str; 3] = [
    "Answer questions related to your role",
    "Provide helpful and accurate information",
    "Escalate complex issues appropriately",
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "generate_system_prompt",
            CATEGORY,
            "Generate system prompts for AI assistants",
            json!({
                "type": "object",
                "properties": {
                    "role": { "type": "string", "description": "e.g. customer support agent" },
                    "company": { "type": "string" },
                    "tone": { "type": "string", "enum": ["professional", "friendly", "technical", "concise"] },
                    "capabilities": { "type": "array", "items": { "type": "string" } },
                    "restrictions": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["role"]
            }),
            generate_system_prompt,
        ),
        ToolDefinition::new(
            "chain_of_thought_prompt",
            CATEGORY,
            "Wrap a problem in chain-of-thought reasoning prompt",
            json!({
                "type": "object",
                "properties": {
                    "problem": { "type": "string" },
                    "domain": { "type": "string", "enum": ["math", "logic", "business", "coding", "general"] }
                },
                "required": ["problem"]
            }),
            chain_of_thought_prompt,
        ),
        ToolDefinition::new(
            "few_shot_template",
            CATEGORY,
            "Generate few-shot learning prompt templates",
            json!({
                "type": "object",
                "properties": {
                    "task": { "type": "string" },
                    "examples": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": { "input": { "type": "string" }, "output": { "type": "string" } }
                        }
                    },
                    "new_input": { "type": "string" }
                },
                "required": ["task", "examples"]
            }),
            few_shot_template,
        ),
    ]
}

// ============================================================================
// generate_system_prompt
// ============================================================================

fn default_company() -> String {
    "our company".to_string()
}

fn default_tone() -> String {
    "professional".to_string()
}

#[derive(Debug, Deserialize)]
struct SystemPromptParams {
    role: String,
    #[serde(default = "default_company")]
    company: String,
    #[serde(default = "default_tone")]
    tone: String,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    restrictions: Vec<String>,
}

fn generate_system_prompt(params: SystemPromptParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let SystemPromptParams { role, company, tone, capabilities, restrictions } = params;

    let capabilities = if capabilities.is_empty() {
        bullets(&DEFAULT_CAPABILITIES.map(String::from))
    } else {
        bullets(&capabilities)
    };
    let restrictions = if restrictions.is_empty() {
        String::new()
    } else {
        format!("## Restrictions\n{}", bullets(&restrictions))
    };

    let prompt = format!(
        "You are a {tone} {role} for {company}.

## Your Capabilities
{capabilities}

## Guidelines
- Always be {tone} and respectful
- Stay focused on your role as {role}
- If you don't know something, say so honestly
- Never make up information

{restrictions}

## Response Format
- Keep responses clear and concise
- Use bullet points for lists
- Ask clarifying questions when needed"
    );

    Ok(json!({
        "character_count": prompt.chars().count(),
        "system_prompt": prompt,
        "role": role,
        "company": company,
    }))
}

// ============================================================================
// chain_of_thought_prompt
// ============================================================================

fn default_domain() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize)]
struct ChainOfThoughtParams {
    problem: String,
    #[serde(default = "default_domain")]
    domain: String,
}

fn chain_of_thought_prompt(params: ChainOfThoughtParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let ChainOfThoughtParams { problem, domain } = params;
    let enhanced = format!(
        "Let's think through this step by step.

Problem: {problem}

Please:
1. Identify the key components of this problem
2. List any assumptions you're making
3. Work through the solution systematically
4. Show your reasoning at each step
5. State your final answer clearly
6. Verify the answer makes sense

Domain context: {domain}

Think carefully and show all your work."
    );

    Ok(json!({
        "enhanced_prompt": enhanced,
        "original_problem": problem,
        "domain": domain,
    }))
}

// ============================================================================
// few_shot_template
// ============================================================================

#[derive(Debug, Deserialize)]
struct FewShotParams {
    task: String,
    examples: Vec<Map<String, Value>>,
    new_input: Option<String>,
}

fn few_shot_template(params: FewShotParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let examples = params
        .examples
        .iter()
        .enumerate()
        .map(|(i, example)| {
            format!(
                "Example {}:\nInput: {}\nOutput: {}",
                i + 1,
                field_text(example, "input"),
                field_text(example, "output")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let new_input = params
        .new_input
        .as_deref()
        .filter(|input| !input.is_empty())
        .unwrap_or("[YOUR INPUT HERE]");

    let prompt = format!(
        "Task: {}\n\nHere are some examples:\n\n{examples}\n\nNow apply the same pattern to:\nInput: {new_input}\nOutput:",
        params.task
    );

    Ok(json!({
        "prompt": prompt,
        "task": params.task,
        "example_count": params.examples.len(),
    }))
}
