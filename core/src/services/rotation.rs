//! Refresh-token rotation: verify-then-reissue.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::token::TokenPair;
use crate::errors::DomainResult;
use crate::repositories::{CredentialRepository, IdentityRepository};
use crate::services::token::TokenService;

/// Composes token service operations into the single refresh flow.
///
/// Verification happens before anything is issued, so a rejected token
/// aborts with no side effects. Issuing the replacement refresh token
/// overwrites the credential record for the (subject, device) key, which
/// is what retires the just-used token.
pub struct RotationService<R: CredentialRepository, I: IdentityRepository> {
    tokens: Arc<TokenService<R, I>>,
}

impl<R: CredentialRepository, I: IdentityRepository> RotationService<R, I> {
    pub fn new(tokens: Arc<TokenService<R, I>>) -> Self {
        Self { tokens }
    }

    /// Rotates a refresh token: verifies the presented token, then
    /// issues a fresh access + refresh pair for the same subject and
    /// device.
    ///
    /// Expired, forged, unknown, and already-rotated tokens are all
    /// rejected by the verification step. A storage failure after
    /// verification surfaces to the caller; the replacement upsert never
    /// landed, so the presented token stays registered and a retry can
    /// succeed.
    pub async fn rotate(&self, refresh_token: &str, device: &str) -> DomainResult<TokenPair> {
        debug!("rotating refresh token");

        let user_id = self.tokens.verify_refresh_token(refresh_token, device).await?;

        let access_token = self.tokens.generate_access_token(user_id).await?;
        let new_refresh_token = match self.tokens.generate_refresh_token(user_id, device).await {
            Ok(token) => token,
            Err(e) => {
                warn!(%user_id, "rotation failed after verification; old token remains registered, caller may retry");
                return Err(e);
            }
        };

        info!(%user_id, "tokens rotated");
        Ok(TokenPair::new(
            access_token,
            new_refresh_token,
            self.tokens.config().access.ttl_seconds,
            self.tokens.config().refresh.ttl_seconds,
        ))
    }
}
