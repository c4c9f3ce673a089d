//! Rewriting text: slugs, cases, replacement, truncation, encodings.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use percent_encoding::percent_decode_str;
use regex::{NoExpand, RegexBuilder};
use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{char_prefix, encode_uri_component, static_regex};

static_regex!(SLUG_STRIP, r"[^A-Za-z0-9_\s-]");
static_regex!(SLUG_GAPS, r"[\s_-]+");
static_regex!(WHITESPACE_RUN, r"\s+");
static_regex!(HTML_ENTITY, r"&amp;|&lt;|&gt;|&quot;|&#39;");

/// Accepts padded or unpadded input and ignores stray trailing bits.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "text_to_slug",
            CATEGORY,
            "Convert text to URL-friendly slug",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "separator": { "type": "string", "default": "-" }
                },
                "required": ["text"]
            }),
            text_to_slug,
        ),
        ToolDefinition::new(
            "text_case_converter",
            CATEGORY,
            "Convert text between cases: upper, lower, title, camel, snake, kebab, pascal, constant",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "case_type": {
                        "type": "string",
                        "enum": ["upper", "lower", "title", "camel", "snake", "kebab", "pascal", "sentence", "constant"]
                    }
                },
                "required": ["text", "case_type"]
            }),
            text_case_converter,
        ),
        ToolDefinition::new(
            "find_replace",
            CATEGORY,
            "Find and replace text with optional regex support",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "find": { "type": "string" },
                    "replace": { "type": "string" },
                    "use_regex": { "type": "boolean", "default": false },
                    "case_sensitive": { "type": "boolean", "default": true }
                },
                "required": ["text", "find", "replace"]
            }),
            find_replace,
        ),
        ToolDefinition::new(
            "truncate_text",
            CATEGORY,
            "Truncate text to specified length with ellipsis",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "max_length": { "type": "number" },
                    "ellipsis": { "type": "string", "default": "..." },
                    "break_on_word": { "type": "boolean", "default": true }
                },
                "required": ["text", "max_length"]
            }),
            truncate_text,
        ),
        ToolDefinition::new(
            "text_encode_decode",
            CATEGORY,
            "Encode or decode text: base64, URI, HTML entities",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "operation": {
                        "type": "string",
                        "enum": ["encode_base64", "decode_base64", "encode_uri", "decode_uri", "encode_html", "decode_html"]
                    }
                },
                "required": ["text", "operation"]
            }),
            text_encode_decode,
        ),
    ]
}

fn default_true() -> bool {
    true
}

// ============================================================================
// text_to_slug
// ============================================================================

#[derive(Debug, Deserialize)]
struct SlugParams {
    text: String,
    #[serde(default = "default_separator")]
    separator: String,
}

fn default_separator() -> String {
    "-".to_string()
}

fn text_to_slug(params: SlugParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let lowered = params.text.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(lowered.trim(), "");
    let joined = SLUG_GAPS.replace_all(&stripped, NoExpand(&params.separator));
    Ok(json!({ "slug": joined.trim_matches('-') }))
}

// ============================================================================
// text_case_converter
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CaseType {
    Upper,
    Lower,
    Title,
    Camel,
    Snake,
    Kebab,
    Pascal,
    Sentence,
    Constant,
}

#[derive(Debug, Deserialize)]
struct CaseParams {
    text: String,
    case_type: CaseType,
}

/// First character upper-cased, the rest lower-cased.
fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn text_case_converter(params: CaseParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = params.text.as_str();
    let spaced = text.replace(['-', '_'], " ");
    let words: Vec<&str> = WHITESPACE_RUN.split(&spaced).collect();
    let lower_words = || words.iter().map(|w| w.to_lowercase()).collect::<Vec<_>>();

    let (result, name) = match params.case_type {
        CaseType::Upper => (text.to_uppercase(), "upper"),
        CaseType::Lower => (text.to_lowercase(), "lower"),
        CaseType::Title => (
            words.iter().map(|w| title_word(w)).collect::<Vec<_>>().join(" "),
            "title",
        ),
        CaseType::Camel => (
            words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { title_word(w) })
                .collect::<String>(),
            "camel",
        ),
        CaseType::Snake => (lower_words().join("_"), "snake"),
        CaseType::Kebab => (lower_words().join("-"), "kebab"),
        CaseType::Pascal => (words.iter().map(|w| title_word(w)).collect::<String>(), "pascal"),
        CaseType::Sentence => (title_word(text), "sentence"),
        CaseType::Constant => (
            words.iter().map(|w| w.to_uppercase()).collect::<Vec<_>>().join("_"),
            "constant",
        ),
    };

    Ok(json!({ "result": result, "case_type": name }))
}

// ============================================================================
// find_replace
// ============================================================================

#[derive(Debug, Deserialize)]
struct FindReplaceParams {
    text: String,
    find: String,
    replace: String,
    #[serde(default)]
    use_regex: bool,
    #[serde(default = "default_true")]
    case_sensitive: bool,
}

/// An invalid pattern is thrown; the replacement is inserted literally.
fn find_replace(params: FindReplaceParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let pattern = if params.use_regex {
        params.find.clone()
    } else {
        regex::escape(&params.find)
    };
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!params.case_sensitive)
        .build()
        .map_err(|e| ToolError::invalid_arguments(format!("Invalid regular expression: {e}")))?;

    let count = regex.find_iter(&params.text).count();
    let result = regex.replace_all(&params.text, NoExpand(&params.replace));

    Ok(json!({ "result": result, "replacements_made": count }))
}

// ============================================================================
// truncate_text
// ============================================================================

#[derive(Debug, Deserialize)]
struct TruncateParams {
    text: String,
    max_length: f64,
    #[serde(default = "default_ellipsis")]
    ellipsis: String,
    #[serde(default = "default_true")]
    break_on_word: bool,
}

fn default_ellipsis() -> String {
    "...".to_string()
}

fn truncate_text(params: TruncateParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let length = params.text.chars().count();
    if length as f64 <= params.max_length {
        return Ok(json!({ "result": params.text, "truncated": false }));
    }

    let budget = params.max_length - params.ellipsis.chars().count() as f64;
    let mut truncated = char_prefix(&params.text, budget);
    if params.break_on_word {
        // Without a space this drops the final character.
        let last_space = truncated
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == ' ')
            .map(|(i, _)| i as f64)
            .last()
            .unwrap_or(-1.0);
        truncated = char_prefix(&truncated, last_space);
    }

    Ok(json!({
        "result": truncated + &params.ellipsis,
        "truncated": true,
        "original_length": length,
    }))
}

// ============================================================================
// text_encode_decode
// ============================================================================

#[derive(Debug, Deserialize)]
struct EncodeParams {
    text: String,
    operation: String,
}

/// Soft errors: undecodable input and unknown operations come back as `error`.
fn text_encode_decode(params: EncodeParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = params.text.as_str();
    let outcome = match params.operation.as_str() {
        "encode_base64" => Ok(STANDARD.encode(text)),
        "decode_base64" => decode_base64(text),
        "encode_uri" => Ok(encode_uri_component(text)),
        "decode_uri" => decode_uri_component(text),
        "encode_html" => Ok(encode_html(text)),
        "decode_html" => Ok(HTML_ENTITY
            .replace_all(text, |caps: &regex::Captures| match &caps[0] {
                "&amp;" => "&",
                "&lt;" => "<",
                "&gt;" => ">",
                "&quot;" => "\"",
                _ => "'",
            })
            .into_owned()),
        other => Err(format!("Unsupported operation: {other}")),
    };

    Ok(match outcome {
        Ok(result) => json!({ "result": result, "operation": params.operation }),
        Err(error) => json!({ "error": error, "operation": params.operation }),
    })
}

/// Decode base64 leniently: URL-safe characters are accepted, anything outside
/// the alphabet is skipped, and decoding stops at the first `=`.
fn decode_base64(text: &str) -> Result<String, String> {
    let mut cleaned: String = text
        .chars()
        .take_while(|&c| c != '=')
        .filter_map(|c| match c {
            '-' => Some('+'),
            '_' => Some('/'),
            c if c.is_ascii_alphanumeric() || c == '+' || c == '/' => Some(c),
            _ => None,
        })
        .collect();
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    let bytes = LENIENT_BASE64.decode(&cleaned).map_err(|e| e.to_string())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn decode_uri_component(text: &str) -> Result<String, String> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !well_formed {
                return Err("URI malformed".to_string());
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| "URI malformed".to_string())
}

fn encode_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::domains::tools::testing::{ok, run};
    use serde_json::json;

    #[test]
    fn test_slug() {
        let out = ok("text_to_slug", json!({ "text": "  Hello, World! Rust_is  great " }));
        assert_eq!(out["slug"], "hello-world-rust-is-great");

        let out = ok("text_to_slug", json!({ "text": "a b", "separator": "_" }));
        assert_eq!(out["slug"], "a_b");
    }

    #[test]
    fn test_case_conversions() {
        let cases = [
            ("upper", "HELLO-WORLD FOO"),
            ("title", "Hello World Foo"),
            ("camel", "helloWorldFoo"),
            ("pascal", "HelloWorldFoo"),
            ("snake", "hello_world_foo"),
            ("kebab", "hello-world-foo"),
            ("sentence", "Hello-world foo"),
            ("constant", "HELLO_WORLD_FOO"),
        ];
        for (case_type, expected) in cases {
            let out = ok(
                "text_case_converter",
                json!({ "text": "hello-WORLD foo", "case_type": case_type }),
            );
            assert_eq!(out["result"], expected, "case {case_type}");
            assert_eq!(out["case_type"], case_type);
        }
    }

    #[test]
    fn test_constant_case() {
        let out = ok(
            "text_case_converter",
            json!({ "text": "max retry-count", "case_type": "constant" }),
        );
        assert_eq!(out["result"], "MAX_RETRY_COUNT");
        assert_eq!(out["case_type"], "constant");
    }

    #[test]
    fn test_case_unknown_is_thrown() {
        assert!(run("text_case_converter", json!({ "text": "x", "case_type": "zigzag" })).is_err());
    }

    #[test]
    fn test_find_replace_literal() {
        let out = ok(
            "find_replace",
            json!({ "text": "a.b.c", "find": ".", "replace": "$1" }),
        );
        assert_eq!(out["result"], "a$1b$1c");
        assert_eq!(out["replacements_made"], 2);
    }

    #[test]
    fn test_find_replace_regex_case_insensitive() {
        let out = ok(
            "find_replace",
            json!({ "text": "Cat cat CAT", "find": "c[a]t", "replace": "dog", "use_regex": true, "case_sensitive": false }),
        );
        assert_eq!(out["result"], "dog dog dog");
        assert_eq!(out["replacements_made"], 3);
    }

    #[test]
    fn test_find_replace_bad_regex_is_thrown() {
        let result = run(
            "find_replace",
            json!({ "text": "x", "find": "(", "replace": "", "use_regex": true }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_truncate() {
        let out = ok("truncate_text", json!({ "text": "short", "max_length": 10 }));
        assert_eq!(out, json!({ "result": "short", "truncated": false }));

        let out = ok(
            "truncate_text",
            json!({ "text": "The quick brown fox jumps", "max_length": 15 }),
        );
        assert_eq!(out["result"], "The quick...");
        assert_eq!(out["original_length"], 25);

        let out = ok(
            "truncate_text",
            json!({ "text": "The quick brown fox jumps", "max_length": 15, "break_on_word": false }),
        );
        assert_eq!(out["result"], "The quick br...");
    }

    #[test]
    fn test_encode_decode_round_trips() {
        let out = ok("text_encode_decode", json!({ "text": "hi there", "operation": "encode_base64" }));
        assert_eq!(out["result"], "aGkgdGhlcmU=");
        let out = ok("text_encode_decode", json!({ "text": "aGkgdGhlcmU=", "operation": "decode_base64" }));
        assert_eq!(out["result"], "hi there");
        let out = ok("text_encode_decode", json!({ "text": "a b/c", "operation": "encode_uri" }));
        assert_eq!(out["result"], "a%20b%2Fc");
        let out = ok("text_encode_decode", json!({ "text": "<a href=\"x\">", "operation": "encode_html" }));
        assert_eq!(out["result"], "&lt;a href=&quot;x&quot;&gt;");
        let out = ok("text_encode_decode", json!({ "text": "&lt;b&gt; &amp; &#39;", "operation": "decode_html" }));
        assert_eq!(out["result"], "<b> & '");
    }

    #[test]
    fn test_decode_uri_malformed_is_soft() {
        let out = ok("text_encode_decode", json!({ "text": "%E0%A4%A", "operation": "decode_uri" }));
        assert_eq!(out["error"], "URI malformed");
        assert_eq!(out["operation"], "decode_uri");
    }

    #[test]
    fn test_unknown_operation_is_soft() {
        let out = ok("text_encode_decode", json!({ "text": "x", "operation": "rot13" }));
        assert!(out["error"].is_string());
    }
}
