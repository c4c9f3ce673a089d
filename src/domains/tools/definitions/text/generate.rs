//! Random text generators. Output depends on the call's RNG.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{capitalize, capped_count, slice_end, unique_in_order};

const MAX_LOREM_PARAGRAPHS: usize = 50;
const MAX_LOREM_SENTENCES: usize = 50;
const MAX_PASSWORDS: usize = 20;
const MAX_PASSWORD_LENGTH: usize = 1024;
const MAX_USERNAMES: usize = 20;

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "reprehenderit", "in",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

const USERNAME_ADJECTIVES: &[&str] = &[
    "cool", "super", "mega", "ultra", "ninja", "epic", "turbo", "alpha", "prime", "ace",
];
const USERNAME_SUFFIXES: &[&str] = &["pro", "dev", "hq", "io", "hub", "lab", "kit", "box", "app", "ai"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "generate_lorem_ipsum",
            CATEGORY,
            "Generate Lorem Ipsum placeholder text",
            json!({
                "type": "object",
                "properties": {
                    "paragraphs": { "type": "number", "default": 1 },
                    "sentences_per_paragraph": { "type": "number", "default": 5 }
                }
            }),
            generate_lorem_ipsum,
        ),
        ToolDefinition::new(
            "generate_password",
            CATEGORY,
            "Generate secure random passwords",
            json!({
                "type": "object",
                "properties": {
                    "length": { "type": "number", "default": 16 },
                    "include_uppercase": { "type": "boolean", "default": true },
                    "include_numbers": { "type": "boolean", "default": true },
                    "include_symbols": { "type": "boolean", "default": true },
                    "count": { "type": "number", "default": 1 }
                }
            }),
            generate_password,
        ),
        ToolDefinition::new(
            "generate_username",
            CATEGORY,
            "Generate creative usernames from a name or keyword",
            json!({
                "type": "object",
                "properties": {
                    "base_word": { "type": "string" },
                    "count": { "type": "number", "default": 5 }
                },
                "required": ["base_word"]
            }),
            generate_username,
        ),
    ]
}

fn default_true() -> bool {
    true
}

// ============================================================================
// generate_lorem_ipsum
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoremParams {
    #[serde(default = "default_paragraphs")]
    paragraphs: f64,
    #[serde(default = "default_sentences")]
    sentences_per_paragraph: f64,
}

fn default_paragraphs() -> f64 {
    1.0
}

fn default_sentences() -> f64 {
    5.0
}

fn lorem_sentence(ctx: &mut ToolContext) -> String {
    let len = 8 + ctx.index(10);
    let mut words: Vec<String> = (0..len)
        .map(|_| ctx.pick(LOREM_WORDS).to_string())
        .collect();
    words[0] = capitalize(&words[0]);
    words.join(" ") + "."
}

fn generate_lorem_ipsum(params: LoremParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let paragraphs = capped_count(params.paragraphs, MAX_LOREM_PARAGRAPHS);
    let sentences = capped_count(params.sentences_per_paragraph, MAX_LOREM_SENTENCES);

    let paras: Vec<String> = (0..paragraphs)
        .map(|_| {
            (0..sentences)
                .map(|_| lorem_sentence(ctx))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let word_count = paras.join(" ").split(' ').count();

    Ok(json!({
        "text": paras.join("\n\n"),
        "paragraphs": paragraphs,
        "word_count": word_count,
    }))
}

// ============================================================================
// generate_password
// ============================================================================

#[derive(Debug, Deserialize)]
struct PasswordParams {
    #[serde(default = "default_password_length")]
    length: f64,
    #[serde(default = "default_true")]
    include_uppercase: bool,
    #[serde(default = "default_true")]
    include_numbers: bool,
    #[serde(default = "default_true")]
    include_symbols: bool,
    #[serde(default = "default_one")]
    count: f64,
}

fn default_password_length() -> f64 {
    16.0
}

fn default_one() -> f64 {
    1.0
}

fn generate_password(params: PasswordParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let mut charset = String::from("abcdefghijklmnopqrstuvwxyz");
    if params.include_uppercase {
        charset.push_str("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }
    if params.include_numbers {
        charset.push_str("0123456789");
    }
    if params.include_symbols {
        charset.push_str("!@#$%^&*()_+-=[]{}|;:,.<>?");
    }
    let charset: Vec<char> = charset.chars().collect();

    let length = capped_count(params.length, MAX_PASSWORD_LENGTH);
    let passwords: Vec<String> = (0..capped_count(params.count, MAX_PASSWORDS))
        .map(|_| (0..length).map(|_| *ctx.pick(&charset)).collect())
        .collect();

    let strength = if length >= 16 && params.include_uppercase && params.include_numbers && params.include_symbols {
        "Strong"
    } else if length >= 12 {
        "Medium"
    } else {
        "Weak"
    };

    Ok(json!({
        "passwords": passwords,
        "strength": strength,
        "length": length,
    }))
}

// ============================================================================
// generate_username
// ============================================================================

#[derive(Debug, Deserialize)]
struct UsernameParams {
    base_word: String,
    #[serde(default = "default_username_count")]
    count: f64,
}

fn default_username_count() -> f64 {
    5.0
}

fn generate_username(params: UsernameParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let base: String = params
        .base_word
        .to_lowercase()
        .split_whitespace()
        .collect();

    let attempts = capped_count(params.count.ceil(), MAX_USERNAMES);
    let mut suggestions = Vec::with_capacity(attempts);
    for _ in 0..attempts {
        let roll = ctx.random();
        let name = if roll < 0.33 {
            format!("{}_{}", ctx.pick(USERNAME_ADJECTIVES), base)
        } else if roll < 0.66 {
            format!("{}_{}", base, ctx.pick(USERNAME_SUFFIXES))
        } else {
            format!("{}{}", base, ctx.int_between(0, 9999))
        };
        suggestions.push(name);
    }

    let mut unique = unique_in_order(suggestions);
    unique.truncate(slice_end(unique.len(), params.count));
    Ok(json!({ "suggestions": unique }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::domains::tools::testing::ok;
    use serde_json::json;

    #[test]
    fn test_lorem_shape() {
        let out = ok("generate_lorem_ipsum", json!({ "paragraphs": 2, "sentences_per_paragraph": 3 }));
        let text = out["text"].as_str().unwrap();
        assert_eq!(text.split("\n\n").count(), 2);
        assert_eq!(text.matches('.').count(), 6);
        assert!(text.starts_with(|c: char| c.is_ascii_uppercase()));
        assert_eq!(out["paragraphs"], 2);
    }

    #[test]
    fn test_lorem_is_capped() {
        let out = ok("generate_lorem_ipsum", json!({ "paragraphs": 10_000, "sentences_per_paragraph": 1 }));
        assert_eq!(out["paragraphs"], 50);
    }

    #[test]
    fn test_password_shape() {
        let out = ok(
            "generate_password",
            json!({ "length": 12, "count": 3, "include_symbols": false }),
        );
        let passwords = out["passwords"].as_array().unwrap();
        assert_eq!(passwords.len(), 3);
        for p in passwords {
            let p = p.as_str().unwrap();
            assert_eq!(p.chars().count(), 12);
            assert!(p.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert_eq!(out["strength"], "Medium");
    }

    #[test]
    fn test_password_defaults_are_strong() {
        let out = ok("generate_password", json!({}));
        assert_eq!(out["strength"], "Strong");
        assert_eq!(out["length"], 16);
        assert_eq!(out["passwords"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_password_count_capped() {
        let out = ok("generate_password", json!({ "count": 500, "length": 4 }));
        assert_eq!(out["passwords"].as_array().unwrap().len(), 20);
        assert_eq!(out["strength"], "Weak");
    }

    #[test]
    fn test_username_contains_base() {
        let out = ok("generate_username", json!({ "base_word": "Jane Doe", "count": 4 }));
        let names = out["suggestions"].as_array().unwrap();
        assert!(!names.is_empty() && names.len() <= 4);
        for name in names {
            assert!(name.as_str().unwrap().contains("janedoe"));
        }
    }
}
