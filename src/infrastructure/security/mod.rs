// src/infrastructure/security/mod.rs
pub mod digest;
pub mod pkce;
pub mod state_codec;
