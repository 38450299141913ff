// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    /// Overrides the issuer derived from the incoming request in the
    /// discovery documents. Set when the gateway sits behind a proxy whose
    /// Host header is not the public one.
    pub public_base_url: Option<String>,
}
