// src/presentation/http/controllers/introspect.rs
use crate::application::commands::flow::{IntrospectTokenCommand, RevokeTokenCommand};
use crate::application::dto::IntrospectionDto;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::FormOrJson;
use crate::presentation::http::openapi::StatusResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenParam {
    pub token: Option<String>,
}

#[utoipa::path(
    post,
    path = "/introspect",
    request_body = TokenParam,
    responses(
        (status = 200, description = "Token introspection per RFC 7662.", body = IntrospectionDto),
        (status = 400, description = "Missing token parameter.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn introspect(
    Extension(state): Extension<HttpState>,
    FormOrJson(request): FormOrJson<TokenParam>,
) -> HttpResult<Json<IntrospectionDto>> {
    let token = request
        .token
        .ok_or_else(|| HttpError::invalid_request("token is required"))?;

    let response = state
        .services
        .flow_commands()
        .introspect_token(IntrospectTokenCommand { token })
        .await
        .into_http()?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/revoke",
    request_body = TokenParam,
    responses(
        (status = 200, description = "Token revocation acknowledged per RFC 7009.", body = StatusResponse),
        (status = 400, description = "Missing token parameter.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn revoke(
    Extension(state): Extension<HttpState>,
    FormOrJson(request): FormOrJson<TokenParam>,
) -> HttpResult<Json<StatusResponse>> {
    let token = request
        .token
        .ok_or_else(|| HttpError::invalid_request("token is required"))?;

    state
        .services
        .flow_commands()
        .revoke_token(RevokeTokenCommand { token })
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "revoked".into(),
    }))
}
