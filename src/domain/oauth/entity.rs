// src/domain/oauth/entity.rs
use crate::domain::oauth::value_objects::{CodeChallengeMethod, RedirectUri};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending authorization request, persisted between `/authorize` and the
/// upstream callback. Consumed exactly once; expired entries are treated as
/// absent no matter what the backing store still holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationState {
    pub client_redirect_uri: RedirectUri,
    pub client_id: Option<String>,
    pub client_state: Option<String>,
    pub client_code_challenge: Option<String>,
    pub client_code_challenge_method: Option<CodeChallengeMethod>,
    /// The gateway's own PKCE verifier for the upstream exchange. Lives only
    /// inside the sealed state blob and is discarded after one use.
    pub upstream_code_verifier: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationState {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A gateway-minted one-time code standing in for the upstream tokens,
/// bound to the redirect URI and PKCE challenge recorded at authorize time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub redirect_uri: Option<RedirectUri>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<CodeChallengeMethod>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
