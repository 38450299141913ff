//! Stateless OAuth 2.1 credential gateway.
//!
//! tollgate sits between MCP-style tool clients and a cloud provider's
//! authorization server. Clients obtain provider access tokens through the
//! standard browser redirect dance without ever seeing the provider's
//! confidential client secret; the gateway itself keeps no state in process
//! memory, so it deploys identically single-instance and serverless.
//!
//! Layers follow the usual hexagonal split: `domain` holds the OAuth value
//! objects and flow entities, `application` the port traits and the flow
//! orchestration commands, `infrastructure` the store backends, crypto
//! engines and upstream HTTP clients, `presentation` the Axum surface.
//!
//! The provider's direct ("API key") API authenticates with RFC 2617 Digest
//! challenges instead; [`infrastructure::upstream::DigestHttpClient`] wraps
//! that handshake for outbound calls.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
