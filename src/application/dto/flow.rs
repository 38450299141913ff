// src/application/dto/flow.rs

/// Outcome of `/authorize`: where to send the user agent.
#[derive(Debug, Clone)]
pub struct AuthorizeRedirect {
    pub location: String,
}

/// Outcome of the upstream callback. Both arms redirect the user agent back
/// to the real client; the error arm carries the upstream error passthrough
/// or the gateway's own generic failure.
#[derive(Debug, Clone)]
pub struct CallbackRedirect {
    pub location: String,
}
