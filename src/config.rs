// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    public_base_url: Option<String>,
    upstream_authorize_url: String,
    upstream_token_url: String,
    upstream_client_id: Option<String>,
    upstream_client_secret: Option<String>,
    upstream_scope: Option<String>,
    state_secret: String,
    redis_url: Option<String>,
    flow_ttl: Duration,
    upstream_timeout: Duration,
    refresh_marker_ttl: Duration,
    default_token_ttl: Duration,
    provider_api_base_url: Option<String>,
    provider_api_public_key: Option<String>,
    provider_api_private_key: Option<String>,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_flow_ttl() -> u64 {
    600
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_refresh_marker_ttl() -> u64 {
    60 * 60 * 24 * 7
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Build configuration from environment variables. Endpoint URLs and the
    /// sealing secret are required up front; the upstream client credentials
    /// are deliberately optional so a misconfigured deployment fails closed
    /// per request instead of refusing to boot.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| default_listen_addr());
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string());

        let upstream_authorize_url = env::var("UPSTREAM_AUTHORIZE_URL")
            .map_err(|_| ConfigError::Missing("UPSTREAM_AUTHORIZE_URL"))?;
        let upstream_token_url = env::var("UPSTREAM_TOKEN_URL")
            .map_err(|_| ConfigError::Missing("UPSTREAM_TOKEN_URL"))?;

        let upstream_client_id = env::var("UPSTREAM_CLIENT_ID").ok();
        let upstream_client_secret = env::var("UPSTREAM_CLIENT_SECRET").ok();
        let upstream_scope = env::var("UPSTREAM_SCOPE").ok();

        let state_secret =
            env::var("STATE_SECRET").map_err(|_| ConfigError::Missing("STATE_SECRET"))?;
        if state_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "STATE_SECRET must be at least 32 bytes".into(),
            ));
        }

        let redis_url = env::var("REDIS_URL").ok();

        let flow_ttl = Duration::from_secs(env_u64("FLOW_TTL_SECONDS", default_flow_ttl()));
        let upstream_timeout = Duration::from_secs(env_u64(
            "UPSTREAM_TIMEOUT_SECONDS",
            default_upstream_timeout(),
        ));
        let refresh_marker_ttl = Duration::from_secs(env_u64(
            "REFRESH_MARKER_TTL_SECONDS",
            default_refresh_marker_ttl(),
        ));
        let default_token_ttl =
            Duration::from_secs(env_u64("DEFAULT_TOKEN_TTL_SECONDS", default_token_ttl()));

        let provider_api_base_url = env::var("PROVIDER_API_BASE_URL").ok();
        let provider_api_public_key = env::var("PROVIDER_API_PUBLIC_KEY").ok();
        let provider_api_private_key = env::var("PROVIDER_API_PRIVATE_KEY").ok();

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_else(default_allowed_origins);

        Ok(Self {
            listen_addr,
            public_base_url,
            upstream_authorize_url,
            upstream_token_url,
            upstream_client_id,
            upstream_client_secret,
            upstream_scope,
            state_secret,
            redis_url,
            flow_ttl,
            upstream_timeout,
            refresh_marker_ttl,
            default_token_ttl,
            provider_api_base_url,
            provider_api_public_key,
            provider_api_private_key,
            allowed_origins,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    /// The gateway's own callback URI registered with the provider.
    pub fn callback_uri(&self) -> String {
        match &self.public_base_url {
            Some(base) => format!("{base}/callback"),
            None => format!("http://{}/callback", self.listen_addr),
        }
    }

    pub fn upstream_authorize_url(&self) -> &str {
        &self.upstream_authorize_url
    }

    pub fn upstream_token_url(&self) -> &str {
        &self.upstream_token_url
    }

    pub fn upstream_client_id(&self) -> Option<&str> {
        self.upstream_client_id.as_deref()
    }

    pub fn upstream_client_secret(&self) -> Option<&str> {
        self.upstream_client_secret.as_deref()
    }

    pub fn upstream_scope(&self) -> Option<&str> {
        self.upstream_scope.as_deref()
    }

    pub fn state_secret(&self) -> &str {
        &self.state_secret
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn flow_ttl(&self) -> Duration {
        self.flow_ttl
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    pub fn refresh_marker_ttl(&self) -> Duration {
        self.refresh_marker_ttl
    }

    pub fn default_token_ttl(&self) -> Duration {
        self.default_token_ttl
    }

    pub fn provider_api_base_url(&self) -> Option<&str> {
        self.provider_api_base_url.as_deref()
    }

    pub fn provider_api_public_key(&self) -> Option<&str> {
        self.provider_api_public_key.as_deref()
    }

    pub fn provider_api_private_key(&self) -> Option<&str> {
        self.provider_api_private_key.as_deref()
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}
