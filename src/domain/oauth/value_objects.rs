// src/domain/oauth/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Redirect URI supplied by a proxied client. Must be an absolute http(s)
/// URL without a fragment; codes are bound to the exact string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedirectUri(String);

impl RedirectUri {
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::Validation("redirect_uri must not be empty".into()));
        }
        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(DomainError::Validation(
                "redirect_uri must be an absolute http(s) URL".into(),
            ));
        }
        if raw.contains('#') {
            return Err(DomainError::Validation(
                "redirect_uri must not contain a fragment".into(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedirectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    #[serde(rename = "code")]
    Code,
}

impl FromStr for ResponseType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "code" => Ok(Self::Code),
            other => Err(DomainError::Unsupported(format!("response_type {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantType {
    #[serde(rename = "authorization_code")]
    AuthorizationCode,
    #[serde(rename = "refresh_token")]
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

impl FromStr for GrantType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "refresh_token" => Ok(Self::RefreshToken),
            other => Err(DomainError::Unsupported(format!("grant_type {other}"))),
        }
    }
}

/// PKCE challenge transformation, per RFC 7636 §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    #[serde(rename = "S256")]
    S256,
    #[serde(rename = "plain")]
    Plain,
}

impl CodeChallengeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
            CodeChallengeMethod::Plain => "plain",
        }
    }
}

impl FromStr for CodeChallengeMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "S256" => Ok(Self::S256),
            "plain" => Ok(Self::Plain),
            other => Err(DomainError::Unsupported(format!(
                "code_challenge_method {other}"
            ))),
        }
    }
}

/// The `state` value the gateway sends through the upstream provider: the
/// internal correlation id joined with the client's own opaque state echo.
///
/// The client payload may itself contain the separator, so decoding splits
/// on the first `:` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeState {
    pub correlation_id: String,
    pub client_state: Option<String>,
}

impl CompositeState {
    pub fn new(correlation_id: impl Into<String>, client_state: Option<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            client_state,
        }
    }

    pub fn encode(&self) -> String {
        match &self.client_state {
            Some(echo) => format!("{}:{}", self.correlation_id, echo),
            None => self.correlation_id.clone(),
        }
    }

    pub fn decode(raw: &str) -> DomainResult<Self> {
        let mut parts = raw.splitn(2, ':');
        let correlation_id = parts
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::Validation("state is missing a correlation id".into()))?;
        let client_state = parts.next().map(str::to_string);
        Ok(Self {
            correlation_id: correlation_id.to_string(),
            client_state,
        })
    }
}
