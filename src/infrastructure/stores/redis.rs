// src/infrastructure/stores/redis.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::flow_store::FlowStore;
use crate::application::ports::refresh_replay::{RefreshReplayStore, RefreshTokenRecord};
use crate::application::ports::token_info::{TokenInfo, TokenInfoStore};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Pool, Runtime};
use redis::AsyncCommands;

/// Networked backend for multi-instance/serverless deployment. TTLs ride on
/// Redis expiry (`SET .. EX`); one-time code consumption is a single
/// `GETDEL` round trip so concurrent redemptions cannot both win.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Create a Redis backed store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> ApplicationResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }
}

fn state_key(key: &str) -> String {
    format!("auth_state:{key}")
}

fn code_key(key: &str) -> String {
    format!("auth_code:{key}")
}

fn issued_key(token_hash: &str) -> String {
    format!("refresh_issued:{token_hash}")
}

fn consumed_key(token_hash: &str) -> String {
    format!("refresh_consumed:{token_hash}")
}

fn token_key(access_token: &str) -> String {
    format!("token_info:{access_token}")
}

#[async_trait]
impl FlowStore for RedisStore {
    async fn put_state(&self, key: &str, sealed: &str, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(state_key(key), sealed, ttl_seconds)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn get_state(&self, key: &str) -> ApplicationResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(state_key(key))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(value)
    }

    async fn delete_state(&self, key: &str) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(state_key(key))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn put_code(&self, key: &str, sealed: &str, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(code_key(key), sealed, ttl_seconds)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn consume_code(&self, key: &str) -> ApplicationResult<Option<String>> {
        let mut conn = self.conn().await?;
        // GETDEL is atomic server-side; a naive GET-then-DEL pair would let
        // two concurrent redemptions both observe the value.
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(code_key(key))
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(value)
    }
}

#[async_trait]
impl RefreshReplayStore for RedisStore {
    async fn record_issued(
        &self,
        token_hash: &str,
        record: RefreshTokenRecord,
        ttl_seconds: u64,
    ) -> ApplicationResult<()> {
        let payload = serde_json::to_string(&record)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(issued_key(token_hash), payload, ttl_seconds)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn find_issued(&self, token_hash: &str) -> ApplicationResult<Option<RefreshTokenRecord>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(issued_key(token_hash))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        match value {
            Some(raw) => {
                let record = serde_json::from_str(&raw)
                    .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn mark_consumed(&self, token_hash: &str, ttl_seconds: u64) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(consumed_key(token_hash), 1, ttl_seconds)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn is_consumed(&self, token_hash: &str) -> ApplicationResult<bool> {
        let mut conn = self.conn().await?;
        let exists: bool = conn
            .exists(consumed_key(token_hash))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(exists)
    }
}

#[async_trait]
impl TokenInfoStore for RedisStore {
    async fn put_token(&self, info: TokenInfo, ttl_seconds: u64) -> ApplicationResult<()> {
        let payload = serde_json::to_string(&info)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(token_key(&info.access_token), payload, ttl_seconds)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn get_token(&self, access_token: &str) -> ApplicationResult<Option<TokenInfo>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(token_key(access_token))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        match value {
            Some(raw) => {
                let info = serde_json::from_str(&raw)
                    .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
                Ok(Some(info))
            }
            None => Ok(None),
        }
    }

    async fn delete_token(&self, access_token: &str) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(token_key(access_token))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }
}

pub fn into_arc(store: RedisStore) -> std::sync::Arc<RedisStore> {
    std::sync::Arc::new(store)
}
