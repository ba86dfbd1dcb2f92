// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use kasho::{
    build_router, create_memory_repository, create_noop_metrics, create_state, AppState,
    AuthConfig,
};
use kasho::domain::MetricsPtr;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const SIGNING_KEY: &str = "test-signing-key";
pub const PASSWORD: &str = "secret123";

// ============================================================================
// Test Setup
// ============================================================================

/// Auth settings for tests: cheapest bcrypt cost, fixed key.
pub fn auth_config() -> AuthConfig {
    // ---
    AuthConfig {
        signing_key: SIGNING_KEY.to_string(),
        token_ttl: Duration::from_secs(1800),
        bcrypt_cost: 4,
    }
}

/// State over an empty in-memory store with the given metrics backend.
pub fn state_with_metrics(metrics: MetricsPtr) -> AppState {
    // ---
    create_state(&auth_config(), metrics, create_memory_repository())
        .expect("Should be able to build state")
}

/// Router over an empty in-memory store and no-op metrics.
pub fn test_app() -> Router {
    // ---
    let metrics = create_noop_metrics().expect("noop metrics");
    build_router(state_with_metrics(metrics))
}

// ============================================================================
// Request helpers
// ============================================================================

/// Sends one request through the router and returns status plus raw body.
pub async fn send_raw(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Body>,
    token: Option<&str>,
) -> (StatusCode, String) {
    // ---
    let mut builder = Request::builder().method(method).uri(path);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = builder.body(body.unwrap_or_else(Body::empty)).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Sends one JSON request and parses the JSON response (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    // ---
    let body = body.map(|v| Body::from(v.to_string()));
    let (status, text) = send_raw(app, method, path, body, token).await;

    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, value)
}

/// Sends a request with a verbatim `Authorization` header value.
pub async fn send_with_auth_header(app: &Router, path: &str, value: &str) -> (StatusCode, Value) {
    // ---
    let request = Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    // ---
    let body = json!({ "email": email, "password": password });
    send(app, Method::POST, "/auth/register", Some(body), None).await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    // ---
    let body = json!({ "email": email, "password": password });
    send(app, Method::POST, "/auth/login", Some(body), None).await
}

/// Registers a user with [`PASSWORD`] and returns a fresh token for them.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    // ---
    let (status, _) = register(app, email, PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = login(app, email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().expect("token in login response").to_string()
}

/// Opens an account and returns its id.
pub async fn open_account(app: &Router, token: &str, currency: &str) -> i64 {
    // ---
    let (status, body) = send(
        app,
        Method::POST,
        "/account/create",
        Some(json!({ "currency": currency })),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");

    body["id"].as_i64().expect("account id")
}

// ============================================================================
// Live server
// ============================================================================

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // ---
        Self::serve(test_app()).await
    }

    pub async fn serve(app: Router) -> Self {
        // ---
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}
