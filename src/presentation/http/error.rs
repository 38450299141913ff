// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC 6749 §5.2 error body returned by every rejected request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    error: &'static str,
    description: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(domain_err) => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                domain_err.to_string(),
            ),
            ApplicationError::InvalidRequest(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_request", msg)
            }
            ApplicationError::InvalidGrant(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_grant", msg)
            }
            ApplicationError::UnsupportedGrantType(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "unsupported_grant_type", msg)
            }
            ApplicationError::UnsupportedResponseType(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "unsupported_response_type", msg)
            }
            ApplicationError::Authentication(msg) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_client", msg)
            }
            // Upstream detail is already logged; clients get the generic
            // server_error wording only.
            ApplicationError::Upstream(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "upstream authorization server error".into(),
            ),
            ApplicationError::Configuration(msg) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "server_error", msg)
            }
            ApplicationError::Infrastructure(msg) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "server_error", msg)
            }
        }
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", description.into())
    }

    fn new(status: StatusCode, error: &'static str, description: String) -> Self {
        Self {
            status,
            error,
            description,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.error.to_string(),
            error_description: self.description,
        };
        (self.status, Json(payload)).into_response()
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
