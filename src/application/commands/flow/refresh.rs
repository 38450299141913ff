// src/application/commands/flow/refresh.rs
use super::{FlowCommandService, token_hash};
use crate::application::{
    dto::TokenResponseDto,
    error::{ApplicationError, ApplicationResult},
    ports::{refresh_replay::RefreshTokenRecord, token_info::TokenInfo},
};
use chrono::Duration;

/// `grant_type=refresh_token` parameters from the token request.
#[derive(Debug, Default)]
pub struct RefreshGrantCommand {
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub client_id: Option<String>,
}

impl FlowCommandService {
    /// Forward a refresh grant upstream with the gateway's confidential
    /// credentials substituted. Refresh tokens are upstream-opaque, so no
    /// flow state lookup happens; the gateway only keeps replay markers for
    /// tokens that upstream has already rotated away.
    pub async fn refresh_grant(
        &self,
        command: RefreshGrantCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        let presented = command
            .refresh_token
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_request("refresh_token is required"))?;
        let presented_hash = token_hash(presented);

        if self.refresh_store.is_consumed(&presented_hash).await? {
            tracing::warn!("rotated refresh token presented again");
            return Err(ApplicationError::invalid_grant(
                "refresh token has already been rotated",
            ));
        }

        if let Some(record) = self.refresh_store.find_issued(&presented_hash).await? {
            if let (Some(owner), Some(caller)) = (&record.client_id, &command.client_id) {
                if owner != caller {
                    return Err(ApplicationError::invalid_grant(
                        "refresh token was issued to another client",
                    ));
                }
            }
        }

        let tokens = self
            .upstream
            .refresh(presented, command.scope.as_deref())
            .await
            .map_err(|err| match err {
                // A reachable upstream refusing the token is the client's
                // problem, not ours.
                ApplicationError::Upstream(_) => {
                    ApplicationError::invalid_grant("upstream rejected the refresh token")
                }
                other => other,
            })?;

        let now = self.clock.now();
        let rotated = tokens
            .refresh_token
            .as_deref()
            .is_some_and(|fresh| fresh != presented);

        if rotated {
            let fresh = tokens.refresh_token.as_deref().unwrap_or_default();
            self.refresh_store
                .mark_consumed(&presented_hash, self.settings.refresh_marker_ttl_seconds)
                .await?;
            self.refresh_store
                .record_issued(
                    &token_hash(fresh),
                    RefreshTokenRecord {
                        client_id: command.client_id.clone(),
                        issued_at: now,
                    },
                    self.settings.refresh_marker_ttl_seconds,
                )
                .await?;
        }

        let expires_in = tokens
            .expires_in
            .unwrap_or(self.settings.default_token_ttl_seconds);
        // Upstream kept the old token? Echo it back so the client always
        // holds a usable refresh token.
        let refresh_token = tokens
            .refresh_token
            .clone()
            .or_else(|| Some(presented.to_string()));

        let info = TokenInfo {
            access_token: tokens.access_token.clone(),
            refresh_token: refresh_token.clone(),
            token_type: tokens.token_type.clone().unwrap_or_else(|| "Bearer".into()),
            scope: tokens.scope.clone(),
            issued_at: now,
            expires_at: now + Duration::seconds(expires_in as i64),
        };
        self.token_store.put_token(info, expires_in).await?;

        Ok(TokenResponseDto {
            access_token: tokens.access_token,
            token_type: tokens.token_type.unwrap_or_else(|| "Bearer".into()),
            expires_in: Some(expires_in),
            refresh_token,
            scope: tokens.scope,
        })
    }
}
