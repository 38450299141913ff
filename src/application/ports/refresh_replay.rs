// src/application/ports/refresh_replay.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping for a refresh token the gateway handed out after an upstream
/// rotation. Keyed by a digest of the token, never the token itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub client_id: Option<String>,
    pub issued_at: DateTime<Utc>,
}

/// Detects refresh-token replay across stateless invocations.
///
/// When upstream rotates a refresh token, the retired token is marked
/// consumed. A consumed token presented again is a replay and must be
/// rejected before any upstream call is made.
#[async_trait]
pub trait RefreshReplayStore: Send + Sync {
    async fn record_issued(
        &self,
        token_hash: &str,
        record: RefreshTokenRecord,
        ttl_seconds: u64,
    ) -> ApplicationResult<()>;

    async fn find_issued(&self, token_hash: &str) -> ApplicationResult<Option<RefreshTokenRecord>>;

    async fn mark_consumed(&self, token_hash: &str, ttl_seconds: u64) -> ApplicationResult<()>;

    async fn is_consumed(&self, token_hash: &str) -> ApplicationResult<bool>;
}
