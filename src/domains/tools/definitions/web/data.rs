//! JSON inspection and JSON/CSV conversion.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::{ToolDefinition, render_result};
use crate::domains::tools::support::{char_prefix, display_value, unique_in_order};

const FORMATTED_PREVIEW_CHARS: f64 = 2000.0;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "parse_json",
            CATEGORY,
            "Parse, validate, and analyze JSON data",
            json!({
                "type": "object",
                "properties": {
                    "json_string": { "type": "string" },
                    "path": { "type": "string", "description": "Dot notation path to extract, e.g. user.name" }
                },
                "required": ["json_string"]
            }),
            parse_json,
        ),
        ToolDefinition::new(
            "json_to_csv",
            CATEGORY,
            "Convert JSON array to CSV format",
            json!({
                "type": "object",
                "properties": {
                    "json_array": { "type": "string", "description": "JSON array string" },
                    "delimiter": { "type": "string", "default": "," }
                },
                "required": ["json_array"]
            }),
            json_to_csv,
        ),
        ToolDefinition::new(
            "csv_to_json",
            CATEGORY,
            "Convert CSV to JSON array",
            json!({
                "type": "object",
                "properties": {
                    "csv": { "type": "string" },
                    "delimiter": { "type": "string", "default": "," }
                },
                "required": ["csv"]
            }),
            csv_to_json,
        ),
    ]
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Keys of a value seen as a keyed collection: object keys, array indices or
/// character positions of a string. Scalars have none.
fn own_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        Value::String(s) => (0..s.chars().count()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Member lookup by key on objects, arrays and strings.
fn member(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(key).cloned(),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
        Value::String(s) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map(|c| Value::String(c.to_string())),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// parse_json
// ============================================================================

#[derive(Debug, Deserialize)]
struct ParseJsonParams {
    json_string: String,
    path: Option<String>,
}

fn parse_json(params: ParseJsonParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let data: Value = match serde_json::from_str(&params.json_string) {
        Ok(data) => data,
        Err(e) => return Ok(json!({ "valid": false, "error": e.to_string() })),
    };

    let root_type = match &data {
        Value::Array(_) => "array",
        Value::Object(_) | Value::Null => "object",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
    };
    let top_level_keys = match &data {
        Value::Object(_) | Value::Array(_) => own_keys(&data),
        _ => Vec::new(),
    };

    let mut out = json!({
        "valid": true,
        "root_type": root_type,
        "total_keys": count_keys(&data),
        "top_level_keys": top_level_keys,
    });
    let extracted = params
        .path
        .as_deref()
        .filter(|p| !p.is_empty())
        .and_then(|path| extract_path(&data, path));
    if let Some(found) = extracted {
        out["extracted_value"] = found;
    }
    out["formatted"] = Value::String(char_prefix(&render_result(&data), FORMATTED_PREVIEW_CHARS));
    Ok(out)
}

/// Keys of every nested object and array, counted recursively.
fn count_keys(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len() + map.values().map(count_keys).sum::<usize>(),
        Value::Array(items) => items.len() + items.iter().map(count_keys).sum::<usize>(),
        _ => 0,
    }
}

/// Walk a dot path through containers. Stepping into a falsy or scalar
/// value ends the walk with nothing.
fn extract_path(data: &Value, path: &str) -> Option<Value> {
    let mut current = data.clone();
    for key in path.split('.') {
        let container = matches!(current, Value::Object(_) | Value::Array(_));
        if !(container && is_truthy(&current)) {
            return None;
        }
        current = member(&current, key)?;
    }
    Some(current)
}

// ============================================================================
// json_to_csv
// ============================================================================

#[derive(Debug, Deserialize)]
struct JsonToCsvParams {
    json_array: String,
    #[serde(default = "default_delimiter")]
    delimiter: String,
}

fn json_to_csv(params: JsonToCsvParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let data: Value = match serde_json::from_str(&params.json_array) {
        Ok(data) => data,
        Err(e) => return Ok(json!({ "error": e.to_string() })),
    };
    let Value::Array(rows) = data else {
        return Ok(json!({ "error": "Input must be a JSON array" }));
    };
    if rows.iter().any(Value::is_null) {
        return Ok(json!({ "error": "Cannot convert undefined or null to object" }));
    }

    let delimiter = params.delimiter.as_str();
    let headers = unique_in_order(rows.iter().flat_map(own_keys));
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| match member(row, h) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) if s.contains(delimiter) => format!("\"{s}\""),
                    Some(other) => display_value(&other),
                })
                .collect::<Vec<_>>()
                .join(delimiter)
        })
        .collect();

    let mut csv = vec![headers.join(delimiter)];
    csv.extend(lines);

    Ok(json!({
        "csv": csv.join("\n"),
        "rows": rows.len(),
        "columns": headers.len(),
        "headers": headers,
    }))
}

// ============================================================================
// csv_to_json
// ============================================================================

#[derive(Debug, Deserialize)]
struct CsvToJsonParams {
    csv: String,
    #[serde(default = "default_delimiter")]
    delimiter: String,
}

/// Naive split: quoted fields containing the delimiter are not supported.
fn csv_to_json(params: CsvToJsonParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let mut lines = params.csv.trim().split('\n');
    let headers: Vec<String> = lines
        .next()
        .map(|line| split_fields(line, &params.delimiter))
        .unwrap_or_default();

    let data: Vec<Value> = lines
        .map(|line| {
            let values = split_fields(line, &params.delimiter);
            let mut record = Map::new();
            for (i, header) in headers.iter().enumerate() {
                let value = values.get(i).cloned().unwrap_or_default();
                record.insert(header.clone(), Value::String(value));
            }
            Value::Object(record)
        })
        .collect();

    let rows = data.len();
    Ok(json!({
        "json": render_result(&Value::Array(data)),
        "rows": rows,
        "columns": headers.len(),
        "headers": headers,
    }))
}

/// Split one CSV line, trimming each field and one pair of wrapping quotes.
/// An empty delimiter splits into single characters.
fn split_fields(line: &str, delimiter: &str) -> Vec<String> {
    let fields: Vec<String> = if delimiter.is_empty() {
        line.chars().map(String::from).collect()
    } else {
        line.split(delimiter).map(str::to_string).collect()
    };
    fields
        .iter()
        .map(|field| {
            let field = field.trim();
            let field = field.strip_prefix('"').unwrap_or(field);
            field.strip_suffix('"').unwrap_or(field).to_string()
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::ok;

    #[test]
    fn test_parse_json_summary() {
        let out = ok(
            "parse_json",
            json!({ "json_string": r#"{"user":{"name":"Ada","tags":["x","y"]},"n":1}"#, "path": "user.name" }),
        );
        assert_eq!(out["valid"], true);
        assert_eq!(out["root_type"], "object");
        // user, n, name, tags, and the two array indices.
        assert_eq!(out["total_keys"], 6);
        assert_eq!(out["top_level_keys"], json!(["user", "n"]));
        assert_eq!(out["extracted_value"], "Ada");
        assert!(out["formatted"].as_str().unwrap().starts_with("{\n  \"user\""));
    }

    #[test]
    fn test_parse_json_path_into_array_and_missing() {
        let doc = r#"{"items":[{"id":7}]}"#;
        let out = ok("parse_json", json!({ "json_string": doc, "path": "items.0.id" }));
        assert_eq!(out["extracted_value"], 7);

        let out = ok("parse_json", json!({ "json_string": doc, "path": "items.9.id" }));
        assert!(out.get("extracted_value").is_none());
    }

    #[test]
    fn test_parse_json_invalid_is_soft() {
        let out = ok("parse_json", json!({ "json_string": "{nope" }));
        assert_eq!(out["valid"], false);
        assert!(out["error"].is_string());
    }

    #[test]
    fn test_null_root_reports_object() {
        let out = ok("parse_json", json!({ "json_string": "null" }));
        assert_eq!(out["root_type"], "object");
        assert_eq!(out["top_level_keys"], json!([]));
    }

    #[test]
    fn test_json_to_csv() {
        let out = ok(
            "json_to_csv",
            json!({ "json_array": r#"[{"a":1,"b":"x,y"},{"a":2,"c":true}]"# }),
        );
        assert_eq!(out["csv"], "a,b,c\n1,\"x,y\",\n2,,true");
        assert_eq!(out["rows"], 2);
        assert_eq!(out["columns"], 3);
        assert_eq!(out["headers"], json!(["a", "b", "c"]));
    }

    #[test]
    fn test_json_to_csv_soft_errors() {
        let out = ok("json_to_csv", json!({ "json_array": r#"{"a":1}"# }));
        assert_eq!(out["error"], "Input must be a JSON array");

        let out = ok("json_to_csv", json!({ "json_array": "[1," }));
        assert!(out["error"].is_string());
    }

    #[test]
    fn test_csv_to_json() {
        let out = ok(
            "csv_to_json",
            json!({ "csv": "name, \"age\"\nAda, 36\nBob\n" }),
        );
        assert_eq!(out["headers"], json!(["name", "age"]));
        assert_eq!(out["rows"], 2);
        let parsed: Value = serde_json::from_str(out["json"].as_str().unwrap()).unwrap();
        assert_eq!(
            parsed,
            json!([{ "name": "Ada", "age": "36" }, { "name": "Bob", "age": "" }])
        );
    }

    #[test]
    fn test_split_fields_strips_one_quote_pair() {
        assert_eq!(split_fields(r#" "a" ;""b""#, ";"), vec!["a", "\"b"]);
    }
}
