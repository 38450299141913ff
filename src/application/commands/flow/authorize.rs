// src/application/commands/flow/authorize.rs
use super::{FlowCommandService, append_query, mint_id};
use crate::{
    application::{
        dto::AuthorizeRedirect,
        error::{ApplicationError, ApplicationResult},
    },
    domain::oauth::{
        AuthorizationState, CodeChallengeMethod, CompositeState, RedirectUri, ResponseType,
    },
};
use chrono::Duration;
use std::str::FromStr;

use crate::infrastructure::security::pkce::PkcePair;

/// Raw `/authorize` query parameters, prior to validation.
#[derive(Debug, Default)]
pub struct BeginAuthorizationCommand {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub scope: Option<String>,
}

impl FlowCommandService {
    /// Validate the request, persist the pending flow, and point the user
    /// agent at the provider's authorize endpoint.
    pub async fn begin_authorization(
        &self,
        command: BeginAuthorizationCommand,
    ) -> ApplicationResult<AuthorizeRedirect> {
        let redirect_uri = command
            .redirect_uri
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_request("redirect_uri is required"))?;
        let redirect_uri = RedirectUri::new(redirect_uri)
            .map_err(|err| ApplicationError::invalid_request(err.to_string()))?;

        match command.response_type.as_deref() {
            None => {
                return Err(ApplicationError::invalid_request(
                    "response_type is required",
                ));
            }
            Some(raw) => {
                ResponseType::from_str(raw).map_err(|_| {
                    ApplicationError::unsupported_response_type(format!(
                        "response_type must be \"code\", got {raw:?}"
                    ))
                })?;
            }
        }

        let client_challenge_method = self.parse_challenge_method(&command)?;

        // Never hand the user agent upstream without our own client id: a
        // missing credential fails closed instead of bypassing auth.
        let upstream_client_id = self
            .settings
            .upstream_client_id
            .as_deref()
            .ok_or_else(|| {
                ApplicationError::configuration("upstream client id is not configured")
            })?;

        let correlation_id = mint_id();
        let pkce = PkcePair::generate();
        let now = self.clock.now();

        let state = AuthorizationState {
            client_redirect_uri: redirect_uri,
            client_id: command.client_id.clone(),
            client_state: command.state.clone(),
            client_code_challenge: command.code_challenge.clone(),
            client_code_challenge_method: client_challenge_method,
            upstream_code_verifier: pkce.verifier,
            created_at: now,
            expires_at: now + Duration::seconds(self.settings.flow_ttl_seconds as i64),
        };

        let sealed = self
            .codec
            .seal(&state)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        self.flow_store
            .put_state(&correlation_id, &sealed, self.settings.flow_ttl_seconds)
            .await?;

        let composite = CompositeState::new(correlation_id, command.state).encode();
        let scope = self
            .settings
            .upstream_scope
            .as_deref()
            .or(command.scope.as_deref());

        let mut params = vec![
            ("response_type", "code"),
            ("client_id", upstream_client_id),
            ("redirect_uri", self.settings.callback_uri.as_str()),
            ("code_challenge", pkce.challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("state", composite.as_str()),
        ];
        if let Some(scope) = scope {
            params.push(("scope", scope));
        }

        tracing::debug!(
            state = %composite,
            "redirecting user agent to upstream authorize endpoint"
        );

        Ok(AuthorizeRedirect {
            location: append_query(&self.settings.upstream_authorize_url, &params),
        })
    }

    fn parse_challenge_method(
        &self,
        command: &BeginAuthorizationCommand,
    ) -> ApplicationResult<Option<CodeChallengeMethod>> {
        match (&command.code_challenge, &command.code_challenge_method) {
            (None, Some(_)) => Err(ApplicationError::invalid_request(
                "code_challenge_method without code_challenge",
            )),
            (None, None) => Ok(None),
            // RFC 7636 §4.3: a missing method means "plain".
            (Some(_), None) => Ok(Some(CodeChallengeMethod::Plain)),
            (Some(_), Some(raw)) => CodeChallengeMethod::from_str(raw)
                .map(Some)
                .map_err(|err| ApplicationError::invalid_request(err.to_string())),
        }
    }
}
