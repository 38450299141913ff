// src/infrastructure/upstream/digest_client.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::infrastructure::security::digest::{
    self, DigestChallenge, DigestCredentials,
};
use reqwest::{Method, Response, StatusCode, header};
use std::time::Duration;

/// HTTP client for the provider's direct API, which authenticates with
/// RFC 2617 Digest challenges instead of OAuth.
///
/// Every request is first issued unauthenticated; a 401 bearing a Digest
/// challenge triggers exactly one authenticated retry with a fresh client
/// nonce. A second 401, or a challenge the engine cannot parse, is an
/// authentication error surfaced to the caller.
pub struct DigestHttpClient {
    http: reqwest::Client,
    base_url: String,
    credentials: DigestCredentials,
}

impl DigestHttpClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: DigestCredentials,
        timeout: Duration,
    ) -> ApplicationResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApplicationError::configuration(err.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub async fn get(&self, path: &str) -> ApplicationResult<Response> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> ApplicationResult<Response> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> ApplicationResult<Response> {
        let first = self.issue(method.clone(), path, body, None).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let challenge = parse_challenge_headers(&first)?;
        let cnonce = digest::generate_cnonce();
        let authorization = digest::authorization_header(
            &self.credentials,
            method.as_str(),
            path,
            &challenge,
            &cnonce,
        );

        let second = self
            .issue(method, path, body, Some(authorization))
            .await?;
        if second.status() == StatusCode::UNAUTHORIZED {
            return Err(ApplicationError::authentication(
                "digest credentials rejected after authenticated retry",
            ));
        }
        Ok(second)
    }

    async fn issue(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        authorization: Option<String>,
    ) -> ApplicationResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(authorization) = authorization {
            eprintln!("AUTH HEADER: {authorization}");
            request = request.header(header::AUTHORIZATION, authorization);
        }
        request
            .send()
            .await
            .map_err(|err| ApplicationError::upstream(format!("provider API request failed: {err}")))
    }
}

fn parse_challenge_headers(response: &Response) -> ApplicationResult<DigestChallenge> {
    let header = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApplicationError::authentication("401 without a WWW-Authenticate challenge")
        })?;

    DigestChallenge::parse(header)
        .map_err(|err| ApplicationError::authentication(err.to_string()))
}
