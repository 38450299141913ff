// src/application/ports/flow_store.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

/// Key/value contract for pending authorization state and minted codes.
///
/// Values are opaque sealed blobs produced by the state codec; the store
/// never interprets them. Both entries carry a backend-enforced TTL, and the
/// orchestrator re-checks expiry from the payload's own timestamps, so a
/// backend that has not yet evicted an expired entry is still safe.
///
/// `get_state` must NOT delete: some flows read the state once on the error
/// path and once on the success path, so removal is the caller's call via
/// `delete_state`. `consume_code` is the opposite: it must atomically return
/// and remove the value in a single backend operation, so two redemptions
/// racing the same code can never both observe it.
#[async_trait]
pub trait FlowStore: Send + Sync {
    async fn put_state(&self, key: &str, sealed: &str, ttl_seconds: u64) -> ApplicationResult<()>;

    async fn get_state(&self, key: &str) -> ApplicationResult<Option<String>>;

    /// Idempotent; deleting a missing key is not an error.
    async fn delete_state(&self, key: &str) -> ApplicationResult<()>;

    async fn put_code(&self, key: &str, sealed: &str, ttl_seconds: u64) -> ApplicationResult<()>;

    /// Atomically fetch and delete. A second caller racing the same key
    /// observes `None`, never the same value twice.
    async fn consume_code(&self, key: &str) -> ApplicationResult<Option<String>>;
}
