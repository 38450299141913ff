// src/presentation/http/controllers/callback.rs
use crate::application::commands::flow::CompleteCallbackCommand;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, extract::Query, response::Response};
use serde::Deserialize;
use utoipa::IntoParams;

use super::found;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/callback",
    params(CallbackParams),
    responses(
        (status = 302, description = "Redirect to the client's redirect URI with a code or a relayed error."),
        (status = 400, description = "Malformed or expired flow state.", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "OAuth"
)]
pub async fn callback(
    Extension(state): Extension<HttpState>,
    Query(params): Query<CallbackParams>,
) -> HttpResult<Response> {
    let command = CompleteCallbackCommand {
        code: params.code,
        state: params.state,
        error: params.error,
        error_description: params.error_description,
    };

    let redirect = state
        .services
        .flow_commands()
        .complete_callback(command)
        .await
        .into_http()?;

    Ok(found(&redirect.location))
}
