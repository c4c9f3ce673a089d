//! JSON-RPC envelope types shared by the dispatcher and the HTTP transport.
//!
//! Only the subset of JSON-RPC 2.0 the server speaks: single requests (no
//! batches), an `id` echoed back verbatim, and a response carrying exactly
//! one of `result` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision announced by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// Error codes
// ============================================================================

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
/// A tool handler failed.
pub const EXECUTION_ERROR: i32 = -32000;

// ============================================================================
// Envelopes
// ============================================================================

/// JSON-RPC request structure.
///
/// `jsonrpc` is accepted but not enforced; a missing `id` reads as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// A string field of `params`, if `params` is an object holding one.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.as_ref()?.get(key)?.as_str()
    }

    /// A field of `params`; absent and `null` both read as `None`.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params
            .as_ref()?
            .get(key)
            .filter(|value| !value.is_null())
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Body that could not be parsed as JSON.
    pub fn parse_error() -> Self {
        Self::error(Value::Null, PARSE_ERROR, "Parse error")
    }

    /// JSON that is not a request object.
    pub fn invalid_request(id: Value) -> Self {
        Self::error(id, INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Unknown method: {method}"))
    }

    pub fn invalid_params(id: Value, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, format!("Invalid params: {}", msg.into()))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Decode a raw request body.
///
/// Non-JSON yields the parse error response; JSON that does not have the
/// request shape yields an invalid request response carrying whatever `id`
/// could be recovered.
pub fn decode_request(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(body).map_err(|_| JsonRpcResponse::parse_error())?;
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|_| JsonRpcResponse::invalid_request(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_minimal_request() {
        let request = decode_request(br#"{"method":"tools/list"}"#).unwrap();
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.id, Value::Null);
        assert!(request.jsonrpc.is_none());
        assert!(request.params.is_none());
    }

    #[test]
    fn test_decode_parse_error() {
        let response = decode_request(b"{not json").unwrap_err();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "jsonrpc": "2.0", "id": null, "error": { "code": -32700, "message": "Parse error" } })
        );
    }

    #[test]
    fn test_decode_invalid_request_keeps_id() {
        let response = decode_request(br#"{"id": 9, "method": 42}"#).unwrap_err();
        assert_eq!(response.id, json!(9));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let response = decode_request(b"[1, 2]").unwrap_err();
        assert_eq!(response.id, Value::Null);
    }

    #[test]
    fn test_response_has_exactly_one_payload() {
        let ok = serde_json::to_value(JsonRpcResponse::success(json!(1), json!({}))).unwrap();
        assert!(ok.get("result").is_some());
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(JsonRpcResponse::method_not_found(json!("a"), "x/y")).unwrap();
        assert!(err.get("result").is_none());
        assert_eq!(err["error"]["message"], "Unknown method: x/y");
        assert_eq!(err["id"], "a");
    }

    #[test]
    fn test_params_accessors() {
        let request = JsonRpcRequest::new(
            1,
            "tools/call",
            Some(json!({ "name": "word_count", "arguments": null })),
        );
        assert_eq!(request.param_str("name"), Some("word_count"));
        assert!(request.param("arguments").is_none());
        assert!(request.param_str("missing").is_none());
    }
}
