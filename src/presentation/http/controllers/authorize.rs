// src/presentation/http/controllers/authorize.rs
use crate::application::commands::flow::BeginAuthorizationCommand;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, extract::Query, response::Response};
use serde::Deserialize;
use utoipa::IntoParams;

use super::found;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AuthorizeParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub scope: Option<String>,
}

#[utoipa::path(
    get,
    path = "/authorize",
    params(AuthorizeParams),
    responses(
        (status = 302, description = "Redirect to the upstream authorize endpoint."),
        (status = 400, description = "Missing or unsupported parameters.", body = crate::presentation::http::error::ErrorResponse),
        (status = 500, description = "Gateway misconfiguration.", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "OAuth"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    Query(params): Query<AuthorizeParams>,
) -> HttpResult<Response> {
    let command = BeginAuthorizationCommand {
        response_type: params.response_type,
        client_id: params.client_id,
        redirect_uri: params.redirect_uri,
        state: params.state,
        code_challenge: params.code_challenge,
        code_challenge_method: params.code_challenge_method,
        scope: params.scope,
    };

    let redirect = state
        .services
        .flow_commands()
        .begin_authorization(command)
        .await
        .into_http()?;

    Ok(found(&redirect.location))
}
