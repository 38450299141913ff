// src/application/ports/upstream.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token response from the provider's token endpoint, in the RFC 6749 shape
/// the gateway re-wraps for its own clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// The gateway's HTTP face toward the provider's token endpoint. The
/// implementation holds the confidential client credentials; callers never
/// see them.
#[async_trait]
pub trait UpstreamAuthorizer: Send + Sync {
    /// Exchange an upstream authorization code using the gateway's own PKCE
    /// verifier and confidential credentials.
    async fn exchange_code(&self, code: &str, verifier: &str)
    -> ApplicationResult<UpstreamTokens>;

    /// Forward a refresh grant with the gateway's credentials substituted.
    async fn refresh(&self, refresh_token: &str, scope: Option<&str>)
    -> ApplicationResult<UpstreamTokens>;
}
