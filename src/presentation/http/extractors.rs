// src/presentation/http/extractors.rs
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use super::error::HttpError;

/// Wire-encoding normalizer for POSTed endpoints: clients may send either
/// `application/x-www-form-urlencoded` or JSON, and the handlers see one
/// parameter struct either way. Unknown content types fall back to form
/// decoding, which RFC 6749 mandates as the baseline.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| HttpError::invalid_request("request body could not be read"))?;

        let value = if content_type.starts_with("application/json") {
            serde_json::from_slice(&bytes)
                .map_err(|err| HttpError::invalid_request(format!("invalid JSON body: {err}")))?
        } else {
            serde_urlencoded::from_bytes(&bytes).map_err(|err| {
                HttpError::invalid_request(format!("invalid form body: {err}"))
            })?
        };

        Ok(Self(value))
    }
}
