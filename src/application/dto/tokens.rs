// src/application/dto/tokens.rs
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC 6749 token response the gateway returns from `/token`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// RFC 7662 introspection response for locally terminated tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntrospectionDto {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl IntrospectionDto {
    pub fn inactive() -> Self {
        Self {
            active: false,
            token_type: None,
            scope: None,
            exp: None,
            iat: None,
        }
    }
}
