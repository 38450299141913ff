// tests/support/helpers.rs
use std::collections::HashMap;
use std::sync::Arc;

use axum::body;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use once_cell::sync::Lazy;
use serde_json::Value;

use super::mocks::{FixedClock, MockUpstream};
use tollgate::application::commands::flow::FlowSettings;
use tollgate::application::services::ApplicationServices;
use tollgate::infrastructure::security::state_codec::StateCodec;
use tollgate::infrastructure::stores::InMemoryStore;
use tollgate::presentation::http::{routes, state::HttpState};

pub const GATEWAY_BASE: &str = "https://gateway.example";
pub const UPSTREAM_AUTHORIZE_URL: &str = "https://provider.example/oauth/authorize";
pub const UPSTREAM_CLIENT_ID: &str = "gateway-client-id";
pub const CLIENT_REDIRECT_URI: &str = "https://client.example/cb";
pub const STATE_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

pub fn flow_settings() -> FlowSettings {
    FlowSettings {
        upstream_authorize_url: UPSTREAM_AUTHORIZE_URL.into(),
        upstream_client_id: Some(UPSTREAM_CLIENT_ID.into()),
        callback_uri: format!("{GATEWAY_BASE}/callback"),
        upstream_scope: None,
        flow_ttl_seconds: 600,
        refresh_marker_ttl_seconds: 60 * 60 * 24 * 7,
        default_token_ttl_seconds: 3600,
    }
}

/// Everything a test needs to drive the gateway end to end: the router plus
/// handles on the fakes behind it.
pub struct TestHarness {
    pub router: axum::Router,
    pub upstream: Arc<MockUpstream>,
    pub clock: Arc<FixedClock>,
    pub store: Arc<InMemoryStore>,
}

pub fn make_harness() -> TestHarness {
    make_harness_with_settings(flow_settings())
}

pub fn make_harness_with_settings(settings: FlowSettings) -> TestHarness {
    make_harness_with(settings, Some(GATEWAY_BASE.into()))
}

// Opt-in request tracing for debugging failing tests: TEST_LOG=1 cargo test
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    }
});

pub fn make_harness_with(settings: FlowSettings, public_base_url: Option<String>) -> TestHarness {
    Lazy::force(&TRACING);

    let store = Arc::new(InMemoryStore::new());
    let upstream = Arc::new(MockUpstream::succeeding());
    let clock = Arc::new(FixedClock::new());
    let codec = Arc::new(StateCodec::new(STATE_SECRET.to_vec()));

    let services = Arc::new(ApplicationServices::new(
        store.clone(),
        store.clone(),
        store.clone(),
        upstream.clone(),
        codec,
        clock.clone(),
        settings,
    ));

    let state = HttpState {
        services,
        public_base_url,
    };

    TestHarness {
        router: routes::build_router_with_rate_limiter(state, false),
        upstream,
        clock,
        store,
    }
}

pub async fn make_test_router() -> axum::Router {
    make_harness().router
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(pairs).unwrap();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("valid json body")
}

/// The Location header of a redirect response.
pub fn location(resp: &axum::response::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header present")
        .to_string()
}

/// Split a redirect target into its base URI and decoded query parameters.
pub fn split_location(location: &str) -> (String, HashMap<String, String>) {
    match location.split_once('?') {
        Some((base, query)) => {
            let params = serde_urlencoded::from_str(query).expect("valid query string");
            (base.to_string(), params)
        }
        None => (location.to_string(), HashMap::new()),
    }
}

/// Assert an OAuth-style JSON error body with the given status and `error`
/// code, and a non-empty `error_description`.
pub async fn assert_oauth_error(
    resp: axum::response::Response,
    expected_status: StatusCode,
    expected_error: &str,
) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");

    let json = body_json(resp).await;
    let error = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let description = json
        .get("error_description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    assert_eq!(error, expected_error, "unexpected error code: {error}");
    assert!(
        !description.is_empty(),
        "expected non-empty error_description"
    );
}
