// src/application/commands/flow/callback.rs
use super::{FlowCommandService, append_query, mint_id};
use crate::{
    application::{
        dto::CallbackRedirect,
        error::{ApplicationError, ApplicationResult},
    },
    domain::oauth::{AuthorizationCode, AuthorizationState, CompositeState},
};
use chrono::Duration;

/// Raw `/callback` query parameters as the provider sent them back.
#[derive(Debug, Default)]
pub struct CompleteCallbackCommand {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl FlowCommandService {
    /// Complete the upstream round trip: recover the pending flow, exchange
    /// the upstream code, mint the gateway's own one-time code, and bounce
    /// the user agent back to the real client.
    ///
    /// Errors returned from here render to the end user; the error arms that
    /// belong to the real client are encoded as redirect parameters instead.
    pub async fn complete_callback(
        &self,
        command: CompleteCallbackCommand,
    ) -> ApplicationResult<CallbackRedirect> {
        let composite = command
            .state
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_request("state is required"))?;
        let composite = CompositeState::decode(composite)
            .map_err(|err| ApplicationError::invalid_request(err.to_string()))?;

        let state = self.take_authorization_state(&composite.correlation_id).await?;

        // The client's own state echo travels the flow twice: inside the
        // composite value and inside the stored record. Prefer the stored
        // copy; the composite is attributable but upstream-controlled.
        let client_state = state.client_state.as_deref().or(composite.client_state.as_deref());

        if let Some(error) = &command.error {
            // Upstream refusals pass through verbatim; they belong to the
            // client, not to us.
            let mut params = vec![("error", error.as_str())];
            if let Some(description) = &command.error_description {
                params.push(("error_description", description.as_str()));
            }
            if let Some(echo) = client_state {
                params.push(("state", echo));
            }
            tracing::info!(error = %error, "relaying upstream authorization error to client");
            return Ok(CallbackRedirect {
                location: append_query(state.client_redirect_uri.as_str(), &params),
            });
        }

        let upstream_code = command
            .code
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_request("code is required"))?;

        let tokens = match self
            .upstream
            .exchange_code(upstream_code, &state.upstream_code_verifier)
            .await
        {
            Ok(tokens) => tokens,
            Err(err) => {
                // Exchange failures are logged with upstream detail but the
                // client only ever sees a generic server_error: upstream
                // bodies don't leak into redirect URIs.
                tracing::error!(error = %err, "upstream code exchange failed");
                let mut params = vec![("error", "server_error")];
                if let Some(echo) = client_state {
                    params.push(("state", echo));
                }
                return Ok(CallbackRedirect {
                    location: append_query(state.client_redirect_uri.as_str(), &params),
                });
            }
        };

        let now = self.clock.now();
        let code_id = mint_id();
        let minted = AuthorizationCode {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            scope: tokens.scope,
            redirect_uri: Some(state.client_redirect_uri.clone()),
            code_challenge: state.client_code_challenge.clone(),
            code_challenge_method: state.client_code_challenge_method,
            created_at: now,
            expires_at: now + Duration::seconds(self.settings.flow_ttl_seconds as i64),
        };

        let sealed = self
            .codec
            .seal(&minted)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        self.flow_store
            .put_code(&code_id, &sealed, self.settings.flow_ttl_seconds)
            .await?;

        let mut params = vec![("code", code_id.as_str())];
        if let Some(echo) = client_state {
            params.push(("state", echo));
        }

        Ok(CallbackRedirect {
            location: append_query(state.client_redirect_uri.as_str(), &params),
        })
    }

    /// One-time read of the pending authorization state. The store contract
    /// leaves deletion to us, so remove the record as soon as it is read;
    /// expired records read as absent even if the backend still holds them.
    async fn take_authorization_state(
        &self,
        correlation_id: &str,
    ) -> ApplicationResult<AuthorizationState> {
        let sealed = self
            .flow_store
            .get_state(correlation_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::invalid_request("unknown or expired authorization state")
            })?;
        self.flow_store.delete_state(correlation_id).await?;

        let state: AuthorizationState = self.codec.open(&sealed).map_err(|err| {
            tracing::warn!(error = %err, "stored authorization state failed to open");
            ApplicationError::invalid_request("unknown or expired authorization state")
        })?;

        if state.is_expired(self.clock.now()) {
            return Err(ApplicationError::invalid_request(
                "unknown or expired authorization state",
            ));
        }
        Ok(state)
    }
}
