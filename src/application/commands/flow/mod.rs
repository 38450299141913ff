// src/application/commands/flow/mod.rs
mod authorize;
mod callback;
mod introspect;
mod redeem;
mod refresh;

pub use authorize::BeginAuthorizationCommand;
pub use callback::CompleteCallbackCommand;
pub use introspect::{IntrospectTokenCommand, RevokeTokenCommand};
pub use redeem::RedeemCodeCommand;
pub use refresh::RefreshGrantCommand;

use std::sync::Arc;

use crate::application::ports::{
    flow_store::FlowStore, refresh_replay::RefreshReplayStore, time::Clock,
    token_info::TokenInfoStore, upstream::UpstreamAuthorizer,
};
use crate::infrastructure::security::state_codec::StateCodec;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Static knobs for the authorization flow. Credentials for the token
/// exchange live behind the upstream port, not here.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub upstream_authorize_url: String,
    pub upstream_client_id: Option<String>,
    /// The gateway's own callback URI registered with the provider.
    pub callback_uri: String,
    pub upstream_scope: Option<String>,
    /// TTL for pending authorization state and minted codes.
    pub flow_ttl_seconds: u64,
    /// TTL for retired-refresh-token markers.
    pub refresh_marker_ttl_seconds: u64,
    /// Assumed lifetime when upstream omits `expires_in`.
    pub default_token_ttl_seconds: u64,
}

/// Drives the redirect dance: authorize, upstream callback, redemption and
/// refresh. Each invocation is self-contained; everything that must survive
/// between HTTP requests goes through the stores.
pub struct FlowCommandService {
    flow_store: Arc<dyn FlowStore>,
    refresh_store: Arc<dyn RefreshReplayStore>,
    token_store: Arc<dyn TokenInfoStore>,
    upstream: Arc<dyn UpstreamAuthorizer>,
    codec: Arc<StateCodec>,
    clock: Arc<dyn Clock>,
    settings: FlowSettings,
}

impl FlowCommandService {
    pub fn new(
        flow_store: Arc<dyn FlowStore>,
        refresh_store: Arc<dyn RefreshReplayStore>,
        token_store: Arc<dyn TokenInfoStore>,
        upstream: Arc<dyn UpstreamAuthorizer>,
        codec: Arc<StateCodec>,
        clock: Arc<dyn Clock>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            flow_store,
            refresh_store,
            token_store,
            upstream,
            codec,
            clock,
            settings,
        }
    }
}

/// Correlation ids and minted code ids: opaque, URL-safe, unguessable.
fn mint_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Refresh tokens are keyed by digest; the token itself never lands in a
/// store key.
fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Append query parameters to a URI that may already carry a query string.
fn append_query(base: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    let query = serde_urlencoded::to_string(params).unwrap_or_default();
    if base.contains('?') {
        format!("{base}&{query}")
    } else {
        format!("{base}?{query}")
    }
}
