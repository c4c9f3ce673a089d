//! Pulling structured values out of free text, and validating them.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use url::Url;

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{static_regex, unique_in_order};

static_regex!(EMAIL, r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}");
static_regex!(EMAIL_EXACT, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$");
static_regex!(URL, r#"https?://[^\s<>"{}|\\^`\[\]]+"#);
static_regex!(PHONE, r"(\+?1?\s?)?(\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4})");

pub(super) fn definitions() -> Vec<ToolDefinition> {
    let text_only = || {
        json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        })
    };

    vec![
        ToolDefinition::new(
            "extract_emails",
            CATEGORY,
            "Extract all email addresses from text",
            text_only(),
            extract_emails,
        ),
        ToolDefinition::new(
            "extract_urls",
            CATEGORY,
            "Extract all URLs from text",
            text_only(),
            extract_urls,
        ),
        ToolDefinition::new(
            "extract_phone_numbers",
            CATEGORY,
            "Extract phone numbers from text",
            text_only(),
            extract_phone_numbers,
        ),
        ToolDefinition::new(
            "validate_email",
            CATEGORY,
            "Validate email address format",
            json!({
                "type": "object",
                "properties": { "email": { "type": "string" } },
                "required": ["email"]
            }),
            validate_email,
        ),
        ToolDefinition::new(
            "validate_url",
            CATEGORY,
            "Validate and parse a URL",
            json!({
                "type": "object",
                "properties": { "url": { "type": "string" } },
                "required": ["url"]
            }),
            validate_url,
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

fn extract_emails(params: TextParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let emails = unique_in_order(EMAIL.find_iter(&params.text).map(|m| m.as_str()));
    Ok(json!({ "emails": emails, "count": emails.len() }))
}

fn extract_urls(params: TextParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let urls = unique_in_order(URL.find_iter(&params.text).map(|m| m.as_str()));
    Ok(json!({ "urls": urls, "count": urls.len() }))
}

/// `count` is taken over the raw matches, `phones` over the trimmed ones.
fn extract_phone_numbers(params: TextParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let raw: Vec<&str> = PHONE.find_iter(&params.text).map(|m| m.as_str()).collect();
    let phones = unique_in_order(raw.iter().map(|p| p.trim()));
    let count = unique_in_order(raw.iter().copied()).len();
    Ok(json!({ "phones": phones, "count": count }))
}

#[derive(Debug, Deserialize)]
struct EmailParams {
    email: String,
}

fn validate_email(params: EmailParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let valid = EMAIL_EXACT.is_match(&params.email);
    let mut parts = params.email.split('@');
    let local_part = parts.next().unwrap_or_default().to_string();
    let domain = parts.next().unwrap_or_default().to_string();
    let issues: Vec<&str> = if valid { vec![] } else { vec!["Invalid email format"] };

    Ok(json!({
        "is_valid": valid,
        "email": params.email,
        "local_part": local_part,
        "domain": domain,
        "issues": issues,
    }))
}

#[derive(Debug, Deserialize)]
struct UrlParams {
    url: String,
}

/// Soft error: an unparsable URL is reported in the result, not thrown.
fn validate_url(params: UrlParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let parsed = match Url::parse(&params.url) {
        Ok(parsed) => parsed,
        Err(_) => {
            return Ok(json!({
                "is_valid": false,
                "url": params.url,
                "error": "Invalid URL format",
            }));
        }
    };

    let mut query = Map::new();
    for (key, value) in parsed.query_pairs() {
        query.insert(key.into_owned(), Value::String(value.into_owned()));
    }
    let search = match parsed.query() {
        Some(q) if !q.is_empty() => format!("?{q}"),
        _ => String::new(),
    };
    let hash = match parsed.fragment() {
        Some(f) if !f.is_empty() => format!("#{f}"),
        _ => String::new(),
    };

    Ok(json!({
        "is_valid": true,
        "protocol": format!("{}:", parsed.scheme()),
        "hostname": parsed.host_str().unwrap_or_default(),
        "port": parsed.port().map(|p| p.to_string()).unwrap_or_else(|| "default".to_string()),
        "pathname": parsed.path(),
        "search": search,
        "hash": hash,
        "params": query,
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::domains::tools::testing::ok;
    use serde_json::json;

    #[test]
    fn test_extract_emails_dedupes() {
        let out = ok(
            "extract_emails",
            json!({ "text": "Mail a@b.com or support@example.org, again a@b.com" }),
        );
        assert_eq!(out["emails"], json!(["a@b.com", "support@example.org"]));
        assert_eq!(out["count"], 2);
    }

    #[test]
    fn test_extract_urls() {
        let out = ok(
            "extract_urls",
            json!({ "text": "See https://rust-lang.org/learn and <http://x.io>." }),
        );
        assert_eq!(out["urls"], json!(["https://rust-lang.org/learn", "http://x.io"]));
    }

    #[test]
    fn test_extract_phone_numbers() {
        let out = ok(
            "extract_phone_numbers",
            json!({ "text": "Call (555) 123-4567 or 555.987.6543" }),
        );
        assert_eq!(out["count"], 2);
        assert_eq!(out["phones"][0], "(555) 123-4567");
    }

    #[test]
    fn test_validate_email() {
        let out = ok("validate_email", json!({ "email": "jane.doe@example.com" }));
        assert_eq!(out["is_valid"], true);
        assert_eq!(out["local_part"], "jane.doe");
        assert_eq!(out["domain"], "example.com");
        assert_eq!(out["issues"], json!([]));

        let out = ok("validate_email", json!({ "email": "nope" }));
        assert_eq!(out["is_valid"], false);
        assert_eq!(out["domain"], "");
        assert_eq!(out["issues"], json!(["Invalid email format"]));
    }

    #[test]
    fn test_validate_url_parses_components() {
        let out = ok(
            "validate_url",
            json!({ "url": "https://example.com:8443/a/b?x=1&y=two#frag" }),
        );
        assert_eq!(out["is_valid"], true);
        assert_eq!(out["protocol"], "https:");
        assert_eq!(out["hostname"], "example.com");
        assert_eq!(out["port"], "8443");
        assert_eq!(out["pathname"], "/a/b");
        assert_eq!(out["search"], "?x=1&y=two");
        assert_eq!(out["hash"], "#frag");
        assert_eq!(out["params"], json!({ "x": "1", "y": "two" }));
    }

    #[test]
    fn test_validate_url_soft_error() {
        let out = ok("validate_url", json!({ "url": "not a url" }));
        assert_eq!(out["is_valid"], false);
        assert_eq!(out["error"], "Invalid URL format");
    }

    #[test]
    fn test_validate_url_default_port() {
        let out = ok("validate_url", json!({ "url": "https://example.com" }));
        assert_eq!(out["port"], "default");
        assert_eq!(out["pathname"], "/");
        assert_eq!(out["search"], "");
    }
}
