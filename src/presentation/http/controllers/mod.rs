// src/presentation/http/controllers/mod.rs
pub mod authorize;
pub mod callback;
pub mod discovery;
pub mod introspect;
pub mod token;

use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};

/// 302 Found. Axum's `Redirect` helpers only cover 303/307/308, and OAuth
/// user-agent bounces conventionally use 302.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
