// src/presentation/http/controllers/token.rs
use crate::application::commands::flow::{RedeemCodeCommand, RefreshGrantCommand};
use crate::application::dto::TokenResponseDto;
use crate::application::error::ApplicationError;
use crate::domain::oauth::GrantType;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::FormOrJson;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;

/// Token request body, form-encoded or JSON.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub scope: Option<String>,
}

#[utoipa::path(
    post,
    path = "/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token response.", body = TokenResponseDto),
        (status = 400, description = "Invalid request or grant.", body = crate::presentation::http::error::ErrorResponse),
        (status = 500, description = "Upstream or configuration failure.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    FormOrJson(request): FormOrJson<TokenRequest>,
) -> HttpResult<Json<TokenResponseDto>> {
    let grant_type = request
        .grant_type
        .as_deref()
        .ok_or_else(|| HttpError::invalid_request("grant_type is required"))?;
    let grant_type = GrantType::from_str(grant_type)
        .map_err(|_| {
            HttpError::from_error(ApplicationError::unsupported_grant_type(format!(
                "grant_type {grant_type:?} is not supported"
            )))
        })?;

    let flow = state.services.flow_commands();
    let response = match grant_type {
        GrantType::AuthorizationCode => {
            flow.redeem_code(RedeemCodeCommand {
                code: request.code,
                redirect_uri: request.redirect_uri,
                code_verifier: request.code_verifier,
                client_id: request.client_id,
            })
            .await
        }
        GrantType::RefreshToken => {
            flow.refresh_grant(RefreshGrantCommand {
                refresh_token: request.refresh_token,
                scope: request.scope,
                client_id: request.client_id,
            })
            .await
        }
    }
    .into_http()?;

    Ok(Json(response))
}
