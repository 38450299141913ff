// src/application/commands/flow/redeem.rs
use super::FlowCommandService;
use crate::{
    application::{
        dto::TokenResponseDto,
        error::{ApplicationError, ApplicationResult},
        ports::token_info::TokenInfo,
    },
    domain::oauth::{AuthorizationCode, CodeChallengeMethod},
};
use chrono::Duration;

use crate::infrastructure::security::pkce;

/// `grant_type=authorization_code` parameters from the token request.
#[derive(Debug, Default)]
pub struct RedeemCodeCommand {
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
    pub client_id: Option<String>,
}

impl FlowCommandService {
    /// Redeem a gateway-minted code for the upstream tokens it stands in
    /// for. The code is consumed atomically before any check runs, so even
    /// a request that fails validation burns it.
    pub async fn redeem_code(
        &self,
        command: RedeemCodeCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        let code_id = command
            .code
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_request("code is required"))?;

        let sealed = self
            .flow_store
            .consume_code(code_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::invalid_grant("authorization code is invalid or expired")
            })?;

        let code: AuthorizationCode = self.codec.open(&sealed).map_err(|err| {
            tracing::warn!(error = %err, "stored authorization code failed to open");
            ApplicationError::invalid_grant("authorization code is invalid or expired")
        })?;

        let now = self.clock.now();
        if code.is_expired(now) {
            return Err(ApplicationError::invalid_grant(
                "authorization code is invalid or expired",
            ));
        }

        self.check_redirect_binding(&code, command.redirect_uri.as_deref())?;
        self.check_pkce_binding(&code, command.code_verifier.as_deref())?;

        let expires_in = code
            .expires_in
            .unwrap_or(self.settings.default_token_ttl_seconds);
        let info = TokenInfo {
            access_token: code.access_token.clone(),
            refresh_token: code.refresh_token.clone(),
            token_type: "Bearer".to_string(),
            scope: code.scope.clone(),
            issued_at: now,
            expires_at: now + Duration::seconds(expires_in as i64),
        };
        self.token_store.put_token(info, expires_in).await?;

        Ok(TokenResponseDto {
            access_token: code.access_token,
            token_type: "Bearer".to_string(),
            expires_in: Some(expires_in),
            refresh_token: code.refresh_token,
            scope: code.scope,
        })
    }

    /// A code bound to a redirect URI can only be redeemed for that exact
    /// string, which stops replay against a different destination.
    fn check_redirect_binding(
        &self,
        code: &AuthorizationCode,
        supplied: Option<&str>,
    ) -> ApplicationResult<()> {
        if let (Some(bound), Some(supplied)) = (&code.redirect_uri, supplied) {
            if bound.as_str() != supplied {
                return Err(ApplicationError::invalid_grant(
                    "redirect_uri does not match the authorization request",
                ));
            }
        }
        Ok(())
    }

    /// The challenge stored at authorize time is authoritative: when
    /// present, a verifier is mandatory and must re-derive it exactly.
    fn check_pkce_binding(
        &self,
        code: &AuthorizationCode,
        verifier: Option<&str>,
    ) -> ApplicationResult<()> {
        let Some(challenge) = &code.code_challenge else {
            return Ok(());
        };

        let verifier = verifier.ok_or_else(|| {
            ApplicationError::invalid_request("code_verifier is required for this code")
        })?;

        let method = code
            .code_challenge_method
            .unwrap_or(CodeChallengeMethod::Plain);
        if !pkce::verify(method, verifier, challenge) {
            return Err(ApplicationError::invalid_grant(
                "code_verifier does not match the stored challenge",
            ));
        }
        Ok(())
    }
}
