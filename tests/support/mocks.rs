// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

use tollgate::application::ApplicationResult;
use tollgate::application::error::ApplicationError;
use tollgate::application::ports::time::Clock;
use tollgate::application::ports::upstream::{UpstreamAuthorizer, UpstreamTokens};

/// What the fake upstream token endpoint should do next.
#[derive(Debug, Clone)]
pub enum UpstreamBehavior {
    Succeed(UpstreamTokens),
    /// Endpoint reachable but answering non-2xx.
    Reject,
    /// Transport failure (timeout, connection refused).
    FailTransport,
}

pub fn upstream_tokens() -> UpstreamTokens {
    UpstreamTokens {
        access_token: "upstream-access-token".into(),
        refresh_token: Some("upstream-refresh-token".into()),
        expires_in: Some(3600),
        token_type: Some("Bearer".into()),
        scope: Some("resources:read".into()),
    }
}

/// Programmable [`UpstreamAuthorizer`] that records every call.
pub struct MockUpstream {
    pub exchange_behavior: Mutex<UpstreamBehavior>,
    pub refresh_behavior: Mutex<UpstreamBehavior>,
    /// (code, verifier) pairs seen by `exchange_code`.
    pub exchanges: Mutex<Vec<(String, String)>>,
    /// (refresh_token, scope) pairs seen by `refresh`.
    pub refreshes: Mutex<Vec<(String, Option<String>)>>,
}

impl MockUpstream {
    pub fn succeeding() -> Self {
        Self {
            exchange_behavior: Mutex::new(UpstreamBehavior::Succeed(upstream_tokens())),
            refresh_behavior: Mutex::new(UpstreamBehavior::Succeed(upstream_tokens())),
            exchanges: Mutex::new(Vec::new()),
            refreshes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_exchange(&self, behavior: UpstreamBehavior) {
        *self.exchange_behavior.lock().unwrap() = behavior;
    }

    pub fn set_refresh(&self, behavior: UpstreamBehavior) {
        *self.refresh_behavior.lock().unwrap() = behavior;
    }

    fn run(behavior: &UpstreamBehavior) -> ApplicationResult<UpstreamTokens> {
        match behavior {
            UpstreamBehavior::Succeed(tokens) => Ok(tokens.clone()),
            UpstreamBehavior::Reject => Err(ApplicationError::upstream(
                "upstream token endpoint returned 400 Bad Request",
            )),
            UpstreamBehavior::FailTransport => Err(ApplicationError::infrastructure(
                "token request failed: connection timed out",
            )),
        }
    }
}

#[async_trait]
impl UpstreamAuthorizer for MockUpstream {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> ApplicationResult<UpstreamTokens> {
        self.exchanges
            .lock()
            .unwrap()
            .push((code.to_string(), verifier.to_string()));
        Self::run(&self.exchange_behavior.lock().unwrap())
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        scope: Option<&str>,
    ) -> ApplicationResult<UpstreamTokens> {
        self.refreshes
            .lock()
            .unwrap()
            .push((refresh_token.to_string(), scope.map(str::to_string)));
        Self::run(&self.refresh_behavior.lock().unwrap())
    }
}

/// Deterministic, advanceable clock so TTL expiry is testable without
/// sleeping.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(
                DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
