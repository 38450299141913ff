// src/application/ports/token_info.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer session the gateway terminates locally: the upstream tokens plus
/// the absolute expiry instant derived at redemption time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub scope: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenInfo {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[async_trait]
pub trait TokenInfoStore: Send + Sync {
    async fn put_token(&self, info: TokenInfo, ttl_seconds: u64) -> ApplicationResult<()>;

    async fn get_token(&self, access_token: &str) -> ApplicationResult<Option<TokenInfo>>;

    /// Idempotent removal, used by revocation and expiry sweeps.
    async fn delete_token(&self, access_token: &str) -> ApplicationResult<()>;
}
