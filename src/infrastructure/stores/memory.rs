// src/infrastructure/stores/memory.rs
use crate::application::ApplicationResult;
use crate::application::ports::flow_store::FlowStore;
use crate::application::ports::refresh_replay::{RefreshReplayStore, RefreshTokenRecord};
use crate::application::ports::token_info::{TokenInfo, TokenInfoStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    fn new(value: T, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }
}

/// Single-process backend for all gateway stores. Entries are pruned on
/// read once their TTL elapses; there is no background sweeper.
///
/// `consume_code` removes under the same lock acquisition that reads, so
/// two tasks racing a code observe it at most once.
#[derive(Default)]
pub struct InMemoryStore {
    states: Mutex<HashMap<String, Entry<String>>>,
    codes: Mutex<HashMap<String, Entry<String>>>,
    issued: Mutex<HashMap<String, Entry<RefreshTokenRecord>>>,
    consumed: Mutex<HashMap<String, Entry<()>>>,
    tokens: Mutex<HashMap<String, Entry<TokenInfo>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn get_live<T: Clone>(map: &Mutex<HashMap<String, Entry<T>>>, key: &str) -> Option<T> {
    let mut guard = map.lock().unwrap();
    match guard.get(key) {
        Some(entry) if entry.is_expired() => {
            guard.remove(key);
            None
        }
        Some(entry) => Some(entry.value.clone()),
        None => None,
    }
}

#[async_trait]
impl FlowStore for InMemoryStore {
    async fn put_state(&self, key: &str, sealed: &str, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut guard = self.states.lock().unwrap();
        guard.insert(key.to_string(), Entry::new(sealed.to_string(), ttl_seconds));
        Ok(())
    }

    async fn get_state(&self, key: &str) -> ApplicationResult<Option<String>> {
        Ok(get_live(&self.states, key))
    }

    async fn delete_state(&self, key: &str) -> ApplicationResult<()> {
        let mut guard = self.states.lock().unwrap();
        guard.remove(key);
        Ok(())
    }

    async fn put_code(&self, key: &str, sealed: &str, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut guard = self.codes.lock().unwrap();
        guard.insert(key.to_string(), Entry::new(sealed.to_string(), ttl_seconds));
        Ok(())
    }

    async fn consume_code(&self, key: &str) -> ApplicationResult<Option<String>> {
        let mut guard = self.codes.lock().unwrap();
        match guard.remove(key) {
            Some(entry) if entry.is_expired() => Ok(None),
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RefreshReplayStore for InMemoryStore {
    async fn record_issued(
        &self,
        token_hash: &str,
        record: RefreshTokenRecord,
        ttl_seconds: u64,
    ) -> ApplicationResult<()> {
        let mut guard = self.issued.lock().unwrap();
        guard.insert(token_hash.to_string(), Entry::new(record, ttl_seconds));
        Ok(())
    }

    async fn find_issued(&self, token_hash: &str) -> ApplicationResult<Option<RefreshTokenRecord>> {
        Ok(get_live(&self.issued, token_hash))
    }

    async fn mark_consumed(&self, token_hash: &str, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut guard = self.consumed.lock().unwrap();
        guard.insert(token_hash.to_string(), Entry::new((), ttl_seconds));
        Ok(())
    }

    async fn is_consumed(&self, token_hash: &str) -> ApplicationResult<bool> {
        Ok(get_live(&self.consumed, token_hash).is_some())
    }
}

#[async_trait]
impl TokenInfoStore for InMemoryStore {
    async fn put_token(&self, info: TokenInfo, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut guard = self.tokens.lock().unwrap();
        guard.insert(info.access_token.clone(), Entry::new(info, ttl_seconds));
        Ok(())
    }

    async fn get_token(&self, access_token: &str) -> ApplicationResult<Option<TokenInfo>> {
        Ok(get_live(&self.tokens, access_token))
    }

    async fn delete_token(&self, access_token: &str) -> ApplicationResult<()> {
        let mut guard = self.tokens.lock().unwrap();
        guard.remove(access_token);
        Ok(())
    }
}

pub fn into_arc(store: InMemoryStore) -> Arc<InMemoryStore> {
    Arc::new(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn code_is_consumed_exactly_once() {
        let store = InMemoryStore::new();
        store.put_code("code-1", "sealed", 600).await.unwrap();

        assert_eq!(
            store.consume_code("code-1").await.unwrap().as_deref(),
            Some("sealed")
        );
        assert_eq!(store.consume_code("code-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_consumers_observe_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        store.put_code("code-race", "sealed", 600).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.consume_code("code-race").await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = InMemoryStore::new();
        store.put_state("st", "sealed", 0).await.unwrap();
        store.put_code("cd", "sealed", 0).await.unwrap();

        assert_eq!(store.get_state("st").await.unwrap(), None);
        assert_eq!(store.consume_code("cd").await.unwrap(), None);
    }

    #[tokio::test]
    async fn state_survives_reads_until_deleted() {
        let store = InMemoryStore::new();
        store.put_state("st", "sealed", 600).await.unwrap();

        assert!(store.get_state("st").await.unwrap().is_some());
        assert!(store.get_state("st").await.unwrap().is_some());

        store.delete_state("st").await.unwrap();
        assert_eq!(store.get_state("st").await.unwrap(), None);
        // Idempotent delete.
        store.delete_state("st").await.unwrap();
    }

    #[tokio::test]
    async fn consumed_markers_expire() {
        let store = InMemoryStore::new();
        store.mark_consumed("h1", 0).await.unwrap();
        assert!(!store.is_consumed("h1").await.unwrap());

        store.mark_consumed("h2", 600).await.unwrap();
        assert!(store.is_consumed("h2").await.unwrap());
    }

    #[tokio::test]
    async fn token_info_round_trips() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let info = TokenInfo {
            access_token: "at-1".into(),
            refresh_token: Some("rt-1".into()),
            token_type: "Bearer".into(),
            scope: Some("read".into()),
            issued_at: now,
            expires_at: now + chrono::Duration::hours(1),
        };
        store.put_token(info.clone(), 3600).await.unwrap();

        let loaded = store.get_token("at-1").await.unwrap().unwrap();
        assert_eq!(loaded.refresh_token.as_deref(), Some("rt-1"));

        store.delete_token("at-1").await.unwrap();
        assert!(store.get_token("at-1").await.unwrap().is_none());
    }
}
