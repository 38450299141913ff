// src/infrastructure/upstream/oauth_client.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::upstream::{UpstreamAuthorizer, UpstreamTokens};
use async_trait::async_trait;
use std::time::Duration;

/// Endpoint and confidential credentials for the provider's token endpoint.
///
/// Credentials are optional at construction so a misconfigured deployment
/// fails closed on first use with a configuration error instead of silently
/// bypassing auth or refusing to boot.
#[derive(Debug, Clone)]
pub struct UpstreamOAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: String,
    /// The gateway's own callback, echoed in the exchange per RFC 6749 §4.1.3.
    pub redirect_uri: String,
}

impl UpstreamOAuthConfig {
    fn credentials(&self) -> ApplicationResult<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(ApplicationError::configuration(
                "upstream client credentials are not configured",
            )),
        }
    }
}

/// reqwest-backed [`UpstreamAuthorizer`]. Requests are form-encoded and
/// bounded by the configured timeout.
///
/// Transport failures (timeouts included) surface as infrastructure errors;
/// a reachable endpoint answering non-2xx surfaces as an upstream error so
/// callers can map it per grant (`server_error` redirect for the callback
/// exchange, `invalid_grant` for refresh).
pub struct HttpUpstreamAuthorizer {
    http: reqwest::Client,
    config: UpstreamOAuthConfig,
}

impl HttpUpstreamAuthorizer {
    pub fn new(config: UpstreamOAuthConfig, timeout: Duration) -> ApplicationResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApplicationError::configuration(err.to_string()))?;

        Ok(Self { http, config })
    }

    async fn post_token_request(&self, form: &[(&str, &str)]) -> ApplicationResult<UpstreamTokens> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|err| {
                ApplicationError::infrastructure(format!("token request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "upstream token endpoint rejected request");
            return Err(ApplicationError::upstream(format!(
                "upstream token endpoint returned {status}"
            )));
        }

        response
            .json::<UpstreamTokens>()
            .await
            .map_err(|err| ApplicationError::upstream(format!("invalid token response: {err}")))
    }
}

#[async_trait]
impl UpstreamAuthorizer for HttpUpstreamAuthorizer {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> ApplicationResult<UpstreamTokens> {
        let (client_id, client_secret) = self.config.credentials()?;
        self.post_token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code_verifier", verifier),
        ])
        .await
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        scope: Option<&str>,
    ) -> ApplicationResult<UpstreamTokens> {
        let (client_id, client_secret) = self.config.credentials()?;
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        if let Some(scope) = scope {
            form.push(("scope", scope));
        }
        self.post_token_request(&form).await
    }
}
