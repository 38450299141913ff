// src/presentation/http/controllers/discovery.rs
use crate::presentation::http::error::HttpResult;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::HeaderMap};
use headers::{HeaderMapExt, Host};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC 8414 authorization server metadata, scoped to what the gateway
/// actually implements.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub introspection_endpoint: String,
    pub revocation_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
}

/// RFC 9728 protected resource metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProtectedResourceMetadata {
    pub resource: String,
    pub authorization_servers: Vec<String>,
    pub bearer_methods_supported: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    responses(
        (status = 200, description = "Authorization server metadata (RFC 8414).", body = AuthorizationServerMetadata),
    ),
    security([]),
    tag = "Discovery"
)]
pub async fn authorization_server_metadata(
    Extension(state): Extension<HttpState>,
    headers: HeaderMap,
) -> HttpResult<Json<AuthorizationServerMetadata>> {
    let base = issuer_base(&state, &headers);

    Ok(Json(AuthorizationServerMetadata {
        issuer: base.clone(),
        authorization_endpoint: format!("{base}/authorize"),
        token_endpoint: format!("{base}/token"),
        introspection_endpoint: format!("{base}/introspect"),
        revocation_endpoint: format!("{base}/revoke"),
        response_types_supported: vec!["code".into()],
        grant_types_supported: vec!["authorization_code".into(), "refresh_token".into()],
        code_challenge_methods_supported: vec!["S256".into(), "plain".into()],
        // Proxied clients are public; PKCE carries the binding.
        token_endpoint_auth_methods_supported: vec!["none".into()],
    }))
}

#[utoipa::path(
    get,
    path = "/.well-known/oauth-protected-resource",
    responses(
        (status = 200, description = "Protected resource metadata (RFC 9728).", body = ProtectedResourceMetadata),
    ),
    security([]),
    tag = "Discovery"
)]
pub async fn protected_resource_metadata(
    Extension(state): Extension<HttpState>,
    headers: HeaderMap,
) -> HttpResult<Json<ProtectedResourceMetadata>> {
    let base = issuer_base(&state, &headers);

    Ok(Json(ProtectedResourceMetadata {
        resource: base.clone(),
        authorization_servers: vec![base],
        bearer_methods_supported: vec!["header".into()],
    }))
}

/// The issuer is the configured public base URL when set, otherwise derived
/// from the incoming request's scheme and host (forwarded-proto aware).
fn issuer_base(state: &HttpState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .typed_get::<Host>()
        .map(|host| host.to_string())
        .unwrap_or_else(|| "localhost".to_string());

    format!("{scheme}://{host}")
}
