//! Boilerplate writers: REST endpoints, SQL statements, commit messages and
//! `.env` templates.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{capitalize, display_value, iso_string};

const COMMIT_TYPES: [(&str, &str); 10] = [
    ("feat", "New feature"),
    ("fix", "Bug fix"),
    ("docs", "Documentation"),
    ("style", "Formatting"),
    ("refactor", "Code restructure"),
    ("test", "Tests"),
    ("chore", "Maintenance"),
    ("perf", "Performance"),
    ("ci", "CI/CD"),
    ("build", "Build system"),
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "api_endpoint_generator",
            CATEGORY,
            "Generate RESTful API endpoint structure",
            json!({
                "type": "object",
                "properties": {
                    "resource": { "type": "string", "description": "Resource name e.g. 'users', 'products'" },
                    "base_url": { "type": "string", "default": "https://api.example.com/v1" },
                    "include_auth": { "type": "boolean", "default": true }
                },
                "required": ["resource"]
            }),
            api_endpoint_generator,
        ),
        ToolDefinition::new(
            "sql_query_builder",
            CATEGORY,
            "Build common SQL queries",
            json!({
                "type": "object",
                "properties": {
                    "query_type": { "type": "string", "enum": ["select", "insert", "update", "delete", "create_table"] },
                    "table": { "type": "string" },
                    "columns": { "type": "array", "items": { "type": "string" } },
                    "conditions": { "type": "string" },
                    "values": { "type": "object" }
                },
                "required": ["query_type", "table"]
            }),
            sql_query_builder,
        ),
        ToolDefinition::new(
            "git_commit_message",
            CATEGORY,
            "Generate conventional git commit messages",
            json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": COMMIT_TYPES.iter().map(|(name, _)| *name).collect::<Vec<_>>()
                    },
                    "scope": { "type": "string" },
                    "description": { "type": "string" },
                    "breaking_change": { "type": "boolean", "default": false },
                    "body": { "type": "string" }
                },
                "required": ["type", "description"]
            }),
            git_commit_message,
        ),
        ToolDefinition::new(
            "environment_variable_generator",
            CATEGORY,
            "Generate .env file template from a list of variables",
            json!({
                "type": "object",
                "properties": {
                    "app_name": { "type": "string" },
                    "variables": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "description": { "type": "string" },
                                "default_value": { "type": "string" },
                                "required": { "type": "boolean" }
                            }
                        }
                    },
                    "environments": {
                        "type": "array",
                        "items": { "type": "string" },
                        "default": ["development", "production"]
                    }
                },
                "required": ["app_name", "variables"]
            }),
            environment_variable_generator,
        ),
    ]
}

fn yes() -> bool {
    true
}

/// Optional text where an empty string means absent.
fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

// ============================================================================
// api_endpoint_generator
// ============================================================================

fn default_base_url() -> String {
    "https://api.example.com/v1".to_string()
}

#[derive(Debug, Deserialize)]
struct EndpointParams {
    resource: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "yes")]
    include_auth: bool,
}

/// The singular is the lowercased resource minus its last character.
fn api_endpoint_generator(params: EndpointParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let plural = params.resource.to_lowercase();
    let mut singular_chars = plural.chars();
    singular_chars.next_back();
    let singular = singular_chars.as_str();

    let collection = format!("{}/{plural}", params.base_url);
    let member = format!("{collection}/{{id}}");
    let body = format!("{{{singular} object}}");

    let endpoint = |method: &str, url: &str, description: String, extra: Option<(&str, Value)>| {
        let mut entry = Map::new();
        entry.insert("method".into(), json!(method));
        entry.insert("url".into(), json!(url));
        entry.insert("description".into(), json!(description));
        if params.include_auth {
            entry.insert("headers".into(), json!({ "Authorization": "Bearer {token}" }));
        }
        if let Some((key, value)) = extra {
            entry.insert(key.into(), value);
        }
        Value::Object(entry)
    };

    let endpoints = vec![
        endpoint(
            "GET",
            collection.as_str(),
            format!("List all {plural}"),
            Some(("query_params", json!(["page", "limit", "sort", "filter"]))),
        ),
        endpoint(
            "POST",
            collection.as_str(),
            format!("Create a new {singular}"),
            Some(("body", json!(body))),
        ),
        endpoint("GET", member.as_str(), format!("Get a specific {singular}"), None),
        endpoint(
            "PUT",
            member.as_str(),
            format!("Update a {singular} (full)"),
            Some(("body", json!(body))),
        ),
        endpoint(
            "PATCH",
            member.as_str(),
            format!("Partially update a {singular}"),
            Some(("body", json!(format!("{{partial {singular} fields}}")))),
        ),
        endpoint("DELETE", member.as_str(), format!("Delete a {singular}"), None),
    ];

    Ok(json!({
        "resource": params.resource,
        "endpoints": endpoints,
        "openapi_tag": capitalize(&params.resource),
    }))
}

// ============================================================================
// sql_query_builder
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
}

impl QueryType {
    fn label(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::CreateTable => "create_table",
        }
    }
}

fn all_columns() -> Vec<String> {
    vec!["*".to_string()]
}

#[derive(Debug, Deserialize)]
struct SqlParams {
    query_type: QueryType,
    table: String,
    #[serde(default = "all_columns")]
    columns: Vec<String>,
    conditions: Option<String>,
    #[serde(default)]
    values: Map<String, Value>,
}

/// Plain string templating; values are quoted, not escaped.
fn sql_query_builder(params: SqlParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let table = &params.table;
    let conditions = non_empty(&params.conditions);
    let where_clause = conditions.map(|c| format!("\nWHERE {c}")).unwrap_or_default();
    let literal = |value: &Value| match value {
        Value::String(s) => format!("'{s}'"),
        other => display_value(other),
    };

    let query = match params.query_type {
        QueryType::Select => format!("SELECT {}\nFROM {table}{where_clause};", params.columns.join(", ")),
        QueryType::Insert => {
            let keys: Vec<&str> = params.values.keys().map(String::as_str).collect();
            let literals: Vec<String> = params.values.values().map(literal).collect();
            format!(
                "INSERT INTO {table} ({})\nVALUES ({});",
                keys.join(", "),
                literals.join(", ")
            )
        }
        QueryType::Update => {
            let assignments: Vec<String> = params
                .values
                .iter()
                .map(|(key, value)| format!("{key} = {}", literal(value)))
                .collect();
            format!("UPDATE {table}\nSET {}{where_clause};", assignments.join(", "))
        }
        QueryType::Delete => format!("DELETE FROM {table}{where_clause};"),
        QueryType::CreateTable => {
            let columns: Vec<String> = params
                .columns
                .iter()
                .filter(|c| *c != "*")
                .map(|c| format!("{c} VARCHAR(255)"))
                .collect();
            format!(
                "CREATE TABLE IF NOT EXISTS {table} (\n  id SERIAL PRIMARY KEY,\n  {},\n  created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\n);",
                columns.join(",\n  ")
            )
        }
    };

    let unguarded_delete = matches!(params.query_type, QueryType::Delete) && conditions.is_none();
    Ok(json!({
        "query": query,
        "query_type": params.query_type.label(),
        "table": params.table,
        "warning": unguarded_delete.then_some("⚠️ No WHERE clause - this will delete ALL rows!"),
    }))
}

// ============================================================================
// git_commit_message
// ============================================================================

#[derive(Debug, Deserialize)]
struct CommitParams {
    #[serde(rename = "type")]
    kind: String,
    scope: Option<String>,
    description: String,
    #[serde(default)]
    breaking_change: bool,
    body: Option<String>,
}

/// Conventional Commits header, optional body and breaking-change footer.
/// Types outside the standard list are accepted but carry no description.
fn git_commit_message(params: CommitParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let scope = non_empty(&params.scope)
        .map(|s| format!("({s})"))
        .unwrap_or_default();
    let bang = if params.breaking_change { "!" } else { "" };
    let header = format!("{}{scope}{bang}: {}", params.kind, params.description);

    let mut parts = vec![header.clone()];
    if let Some(body) = non_empty(&params.body) {
        parts.push(body.to_string());
    }
    if params.breaking_change {
        parts.push("\nBREAKING CHANGE: This is a breaking change".to_string());
    }

    let mut out = json!({
        "commit_message": parts.join("\n"),
        "header": header,
        "conventional_commits_compliant": true,
    });
    if let Some((_, meaning)) = COMMIT_TYPES.iter().find(|(name, _)| *name == params.kind) {
        out["type_description"] = json!(meaning);
    }
    Ok(out)
}

// ============================================================================
// environment_variable_generator
// ============================================================================

fn default_environments() -> Vec<String> {
    vec!["development".to_string(), "production".to_string()]
}

#[derive(Debug, Deserialize)]
struct EnvParams {
    app_name: String,
    variables: Vec<Map<String, Value>>,
    #[serde(default = "default_environments")]
    environments: Vec<String>,
}

fn environment_variable_generator(params: EnvParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = |var: &Map<String, Value>, key: &str| -> String {
        var.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let entries: Vec<String> = params
        .variables
        .iter()
        .map(|var| {
            let name = text(var, "name");
            let description = Some(text(var, "description"))
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| name.clone());
            let required = var.get("required").and_then(Value::as_bool).unwrap_or(false);
            let marker = if required { " (REQUIRED)" } else { "" };
            format!("# {description}{marker}\n{name}={}", text(var, "default_value"))
        })
        .collect();

    let env_file = format!(
        "# {} Environment Variables\n# Generated: {}\n\n{}",
        params.app_name,
        iso_string(&ctx.now()),
        entries.join("\n\n")
    );

    Ok(json!({
        "app_name": params.app_name,
        "env_file": env_file,
        "variable_count": params.variables.len(),
        "environments": params.environments,
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::ok;

    #[test]
    fn test_endpoints_with_auth() {
        let out = ok("api_endpoint_generator", json!({ "resource": "Users" }));
        assert_eq!(out["openapi_tag"], "Users");
        let endpoints = out["endpoints"].as_array().unwrap();
        assert_eq!(endpoints.len(), 6);
        assert_eq!(endpoints[0]["url"], "https://api.example.com/v1/users");
        assert_eq!(endpoints[0]["headers"]["Authorization"], "Bearer {token}");
        assert_eq!(endpoints[1]["description"], "Create a new user");
        assert_eq!(endpoints[1]["body"], "{user object}");
        assert_eq!(endpoints[4]["body"], "{partial user fields}");
        assert_eq!(endpoints[5]["url"], "https://api.example.com/v1/users/{id}");
    }

    #[test]
    fn test_endpoints_without_auth() {
        let out = ok(
            "api_endpoint_generator",
            json!({ "resource": "orders", "base_url": "/api", "include_auth": false }),
        );
        assert!(out["endpoints"][0].get("headers").is_none());
        assert_eq!(out["endpoints"][2]["url"], "/api/orders/{id}");
    }

    #[test]
    fn test_sql_select_and_insert() {
        let out = ok(
            "sql_query_builder",
            json!({ "query_type": "select", "table": "users", "columns": ["id", "name"], "conditions": "age > 18" }),
        );
        assert_eq!(out["query"], "SELECT id, name\nFROM users\nWHERE age > 18;");
        assert_eq!(out["warning"], Value::Null);

        let out = ok(
            "sql_query_builder",
            json!({ "query_type": "insert", "table": "users", "values": { "name": "Ada", "age": 36 } }),
        );
        assert_eq!(out["query"], "INSERT INTO users (name, age)\nVALUES ('Ada', 36);");
    }

    #[test]
    fn test_sql_update_and_create_table() {
        let out = ok(
            "sql_query_builder",
            json!({ "query_type": "update", "table": "t", "values": { "a": "x", "b": true }, "conditions": "id = 1" }),
        );
        assert_eq!(out["query"], "UPDATE t\nSET a = 'x', b = true\nWHERE id = 1;");

        let out = ok(
            "sql_query_builder",
            json!({ "query_type": "create_table", "table": "t", "columns": ["name", "email"] }),
        );
        assert_eq!(
            out["query"],
            "CREATE TABLE IF NOT EXISTS t (\n  id SERIAL PRIMARY KEY,\n  name VARCHAR(255),\n  email VARCHAR(255),\n  created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\n);"
        );
    }

    #[test]
    fn test_sql_delete_without_where_warns() {
        let out = ok("sql_query_builder", json!({ "query_type": "delete", "table": "users" }));
        assert_eq!(out["query"], "DELETE FROM users;");
        assert_eq!(out["warning"], "⚠️ No WHERE clause - this will delete ALL rows!");
    }

    #[test]
    fn test_commit_message() {
        let out = ok(
            "git_commit_message",
            json!({
                "type": "feat",
                "scope": "api",
                "description": "add search",
                "body": "Adds full-text search.",
                "breaking_change": true
            }),
        );
        assert_eq!(out["header"], "feat(api)!: add search");
        assert_eq!(
            out["commit_message"],
            "feat(api)!: add search\nAdds full-text search.\n\nBREAKING CHANGE: This is a breaking change"
        );
        assert_eq!(out["type_description"], "New feature");
    }

    #[test]
    fn test_commit_message_custom_type() {
        let out = ok("git_commit_message", json!({ "type": "wip", "description": "stuff" }));
        assert_eq!(out["commit_message"], "wip: stuff");
        assert!(out.get("type_description").is_none());
    }

    #[test]
    fn test_env_file() {
        let out = ok(
            "environment_variable_generator",
            json!({
                "app_name": "shop",
                "variables": [
                    { "name": "DATABASE_URL", "description": "Postgres URL", "required": true },
                    { "name": "PORT", "default_value": "3000" }
                ]
            }),
        );
        assert_eq!(
            out["env_file"],
            "# shop Environment Variables\n# Generated: 2024-01-15T10:30:00.000Z\n\n# Postgres URL (REQUIRED)\nDATABASE_URL=\n\n# PORT\nPORT=3000"
        );
        assert_eq!(out["variable_count"], 2);
        assert_eq!(out["environments"], json!(["development", "production"]));
    }
}
