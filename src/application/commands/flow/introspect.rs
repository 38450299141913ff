// src/application/commands/flow/introspect.rs
use super::{FlowCommandService, token_hash};
use crate::application::{ApplicationResult, dto::IntrospectionDto};

pub struct IntrospectTokenCommand {
    pub token: String,
}

pub struct RevokeTokenCommand {
    pub token: String,
}

impl FlowCommandService {
    /// Check a locally terminated bearer token. Unknown and expired tokens
    /// are both just `active: false`; introspection never errors on bad
    /// input.
    pub async fn introspect_token(
        &self,
        command: IntrospectTokenCommand,
    ) -> ApplicationResult<IntrospectionDto> {
        let Some(info) = self.token_store.get_token(&command.token).await? else {
            return Ok(IntrospectionDto::inactive());
        };

        if info.is_expired(self.clock.now()) {
            // Lazily drop the stale record; the backend TTL is the backstop.
            self.token_store.delete_token(&command.token).await?;
            return Ok(IntrospectionDto::inactive());
        }

        Ok(IntrospectionDto {
            active: true,
            token_type: Some(info.token_type),
            scope: info.scope,
            exp: Some(info.expires_at.timestamp()),
            iat: Some(info.issued_at.timestamp()),
        })
    }

    /// Revoke a locally terminated token. Always succeeds; revoking an
    /// unknown token is a no-op per RFC 7009. The associated refresh token,
    /// if any, is marked consumed so it cannot be replayed afterwards.
    pub async fn revoke_token(&self, command: RevokeTokenCommand) -> ApplicationResult<()> {
        if let Some(info) = self.token_store.get_token(&command.token).await? {
            if let Some(refresh_token) = &info.refresh_token {
                self.refresh_store
                    .mark_consumed(
                        &token_hash(refresh_token),
                        self.settings.refresh_marker_ttl_seconds,
                    )
                    .await?;
            }
        }
        self.token_store.delete_token(&command.token).await?;
        Ok(())
    }
}
