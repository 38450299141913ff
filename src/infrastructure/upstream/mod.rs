// src/infrastructure/upstream/mod.rs
pub mod digest_client;
pub mod oauth_client;

pub use digest_client::DigestHttpClient;
pub use oauth_client::{HttpUpstreamAuthorizer, UpstreamOAuthConfig};
