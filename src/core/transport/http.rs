//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests, plus a few read-only
//! documents (health, catalog, landing page). This allows standard HTTP
//! clients (curl, browsers, etc.) to communicate with the MCP server.

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{MethodRouter, get, post},
};
use bytes::Bytes;
use http::{HeaderName, HeaderValue, StatusCode, header};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};

use super::{TransportConfig, TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::protocol::decode_request;

/// Headers sent with every response of the RPC endpoint.
const RPC_CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Build the axum application for a server.
    pub fn router(&self, server: McpServer) -> Router {
        let rpc: MethodRouter<McpServer> = post(handle_rpc)
            .options(handle_preflight)
            .fallback(method_not_allowed);

        // The RPC route answers its own preflight, so the CORS layer only
        // wraps the read-only documents.
        let mut documents = Router::new()
            .route("/health", get(health_check))
            .route("/tools", get(tool_catalog))
            .route("/", get(landing_page));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]);
            documents = documents.layer(cors);
        }

        Router::new()
            .route(&self.config.rpc_path, rpc)
            .merge(documents)
            .with_state(server)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.config.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");
        info!("  → Catalog:  GET /tools");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

fn with_rpc_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in RPC_CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// Handle JSON-RPC requests.
///
/// The body is decoded by hand so that malformed JSON gets a JSON-RPC parse
/// error instead of axum's plain-text rejection.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(State(server): State<McpServer>, body: Bytes) -> Response {
    let request = match decode_request(&body) {
        Ok(request) => request,
        Err(rejection) => {
            debug!("Rejected request body ({} bytes)", body.len());
            return with_rpc_headers((StatusCode::BAD_REQUEST, Json(rejection)).into_response());
        }
    };

    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = server.handle(request);
    with_rpc_headers((StatusCode::OK, Json(response)).into_response())
}

/// CORS preflight: empty 200 with the permissive headers.
async fn handle_preflight() -> Response {
    with_rpc_headers(StatusCode::OK.into_response())
}

async fn method_not_allowed() -> Response {
    with_rpc_headers(
        (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({ "error": "Method not allowed" })),
        )
            .into_response(),
    )
}

/// Health check endpoint.
async fn health_check(State(server): State<McpServer>) -> impl IntoResponse {
    Json(server.health())
}

/// Tool catalog grouped by category.
async fn tool_catalog(State(server): State<McpServer>) -> impl IntoResponse {
    Json(server.catalog())
}

/// Human-readable landing page.
async fn landing_page(State(server): State<McpServer>) -> Html<String> {
    Html(render_landing_page(&server))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_landing_page(server: &McpServer) -> String {
    let registry = server.registry();
    let name = escape_html(server.name());
    let rpc_path = match &server.config().transport {
        TransportConfig::Http(cfg) => escape_html(&cfg.rpc_path),
        #[allow(unreachable_patterns)]
        _ => "/mcp".to_string(),
    };

    let cards: String = registry
        .catalog()
        .iter()
        .map(|listing| {
            let items: String = listing
                .tools
                .iter()
                .map(|tool| format!("<li>{tool}</li>"))
                .collect();
            format!(
                "<div class=\"card\"><h3>{} ({})</h3><ul>{items}</ul></div>\n",
                escape_html(listing.category.label()),
                listing.count
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{name}</title>
<style>
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: #0a0a0f; color: #e0e0f0; margin: 0; }}
  header {{ padding: 48px 20px; text-align: center; border-bottom: 1px solid #1e3a5f; }}
  .container {{ max-width: 1100px; margin: 0 auto; padding: 32px 20px; }}
  .grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 20px; }}
  .card {{ background: #0e1628; border: 1px solid #1e3a5f; border-radius: 12px; padding: 20px; }}
  .card h3 {{ color: #00d2ff; margin-top: 0; }}
  .card ul {{ color: #8899bb; font-size: 0.9em; padding-left: 18px; }}
  code {{ color: #a0e4ff; }}
</style>
</head>
<body>
<header>
  <h1>{name}</h1>
  <p>Version {version} &middot; {total} tools in {categories} categories</p>
</header>
<div class="container">
  <h2>Endpoints</h2>
  <ul>
    <li><code>POST {rpc_path}</code> JSON-RPC: <code>initialize</code>, <code>tools/list</code>, <code>tools/call</code></li>
    <li><code>GET /tools</code> tool catalog by category</li>
    <li><code>GET /health</code> health probe</li>
  </ul>
  <h2>Tools</h2>
  <div class="grid">
{cards}  </div>
</div>
</body>
</html>
"#,
        version = escape_html(server.version()),
        total = registry.len(),
        categories = registry.categories().len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::{ToolEnvironment, ToolRegistry};
    use axum::body::Body;
    use http::{Method, Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let registry = ToolRegistry::builtin(ToolEnvironment::system().with_seed(Some(3))).unwrap();
        let server = McpServer::with_registry(Config::default(), registry);
        HttpTransport::new(HttpConfig::default()).router(server)
    }

    async fn send(request: Request<Body>) -> (StatusCode, http::HeaderMap, Bytes) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_body(body: &Bytes) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_tools_call_over_http() {
        let (status, headers, body) = send(post(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"word_count","arguments":{"text":"Hello world"}}}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let response = json_body(&body);
        assert_eq!(response["id"], 1);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let result: Value = serde_json::from_str(text).unwrap();
        assert_eq!(result["words"], 2);
    }

    #[tokio::test]
    async fn test_protocol_errors_are_200() {
        let (status, _, body) = send(post(r#"{"id":"x","method":"bogus/method"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let response = json_body(&body);
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], "x");
    }

    #[tokio::test]
    async fn test_parse_error() {
        let (status, _, body) = send(post("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(&body),
            serde_json::json!({ "jsonrpc": "2.0", "id": null, "error": { "code": -32700, "message": "Parse error" } })
        );
    }

    #[tokio::test]
    async fn test_invalid_request_shape() {
        let (status, _, body) = send(post(r#"{"id": 4}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let response = json_body(&body);
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], 4);
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/mcp")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_browser_preflight_reaches_rpc_handler() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/mcp")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers.get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_documents_carry_cors_headers() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_other_verbs_not_allowed() {
        let (status, _, body) = send(get("/mcp")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(&body), serde_json::json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, _, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let health = json_body(&body);
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["tools_available"], 90);
        assert_eq!(health["categories"][0], "Text & Content");
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let (_, _, body) = send(get("/tools")).await;
        let catalog = json_body(&body);
        assert_eq!(catalog["total_tools"], 90);
        let total: u64 = catalog["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["count"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 90);
    }

    #[tokio::test]
    async fn test_landing_page() {
        let (status, headers, body) = send(get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<title>Utility Toolbox MCP Server</title>"));
        assert!(html.contains("AI Prompts (10)"));
        assert!(html.contains("<li>press_release_template</li>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
