//! Main token service implementation.

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::credential::{CredentialRecord, TokenClass};
use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::Claims;
use crate::errors::{ConfigError, DomainError, DomainResult, TokenError};
use crate::repositories::{CredentialRepository, IdentityRepository};
use crate::services::cipher::CipherBox;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Orchestrates codec, cipher box, and credential store for the four
/// token classes.
///
/// Generation signs a token and, for every class except access, seals it
/// and upserts the shadow record. Verification decodes the presented
/// token, cross-checks it against the decrypted shadow record, and hands
/// the subject identity back out. The service exclusively owns record
/// creation and deletion.
pub struct TokenService<R: CredentialRepository, I: IdentityRepository> {
    pub(crate) credentials: R,
    identities: I,
    cipher: CipherBox,
    config: TokenServiceConfig,
    access_codec: TokenCodec,
    refresh_codec: TokenCodec,
    verify_email_codec: TokenCodec,
    recover_password_codec: TokenCodec,
}

impl<R: CredentialRepository, I: IdentityRepository> TokenService<R, I> {
    /// Creates a new token service.
    ///
    /// Fails with a [`ConfigError`] when any class is missing its
    /// signing secret; the cipher box has already validated its own key.
    pub fn new(
        credentials: R,
        identities: I,
        cipher: CipherBox,
        config: TokenServiceConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let access_codec = TokenCodec::new(TokenClass::Access, &config.access)?;
        let refresh_codec = TokenCodec::new(TokenClass::Refresh, &config.refresh)?;
        let verify_email_codec = TokenCodec::new(TokenClass::VerifyEmail, &config.verify_email)?;
        let recover_password_codec =
            TokenCodec::new(TokenClass::RecoverPassword, &config.recover_password)?;

        Ok(Self {
            credentials,
            identities,
            cipher,
            config,
            access_codec,
            refresh_codec,
            verify_email_codec,
            recover_password_codec,
        })
    }

    /// Service configuration (read-only after construction).
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    fn codec(&self, class: TokenClass) -> &TokenCodec {
        match class {
            TokenClass::Access => &self.access_codec,
            TokenClass::Refresh => &self.refresh_codec,
            TokenClass::VerifyEmail => &self.verify_email_codec,
            TokenClass::RecoverPassword => &self.recover_password_codec,
        }
    }

    /// Shared generation routine over the class enum.
    ///
    /// Signs the token and, for persisted classes, seals it and upserts
    /// the shadow record. The plaintext token goes back to the caller;
    /// only the sealed form is ever stored.
    async fn generate(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<String> {
        debug!(class = %class, "generating token");
        let codec = self.codec(class);
        let token = codec
            .issue(subject, device)
            .map_err(|source| DomainError::token(class, source))?;

        if !class.is_persisted() {
            return Ok(token);
        }

        let sealed = self
            .cipher
            .seal(&token)
            .map_err(|source| DomainError::cipher(class, source))?;

        // The record outlives the signed token by the configured grace;
        // the live expiry check is the token's own exp claim.
        let expires_at = Utc::now() + codec.ttl() + self.config.record_grace();
        let record =
            CredentialRecord::new(class, subject, device.map(str::to_string), sealed, expires_at);
        self.credentials.upsert(record).await?;

        info!(class = %class, "token generated and record stored");
        Ok(token)
    }

    /// Shared verification routine for the persisted classes.
    ///
    /// Fails fast on codec-level expiry/signature problems, then
    /// cross-checks the presented token against the decrypted shadow
    /// record. A rotated-out token decodes fine but never matches the
    /// current record, which is the replay guard.
    async fn verify(
        &self,
        class: TokenClass,
        token: &str,
        device: Option<&str>,
    ) -> DomainResult<String> {
        let claims = self
            .codec(class)
            .parse(token)
            .map_err(|source| DomainError::token(class, source))?;

        // The device claim is embedded redundantly in refresh tokens;
        // disagreement with the caller-supplied device is a forgery.
        if class.is_device_keyed() && claims.device.as_deref() != device {
            warn!(class = %class, "device claim mismatch");
            return Err(DomainError::token(class, TokenError::TokenInvalid));
        }

        let record = self
            .credentials
            .find(class, &claims.sub, device)
            .await?
            .ok_or_else(|| DomainError::token(class, TokenError::TokenNotFound))?;

        // A record past its expiry is dead even when the sweep has not
        // collected it yet.
        if record.is_expired() {
            return Err(DomainError::token(class, TokenError::TokenNotFound));
        }

        let stored = self
            .cipher
            .open(&record.cipher_text)
            .map_err(|source| DomainError::cipher(class, source))?;

        if !constant_time_eq(stored.as_bytes(), token.as_bytes()) {
            warn!(class = %class, "presented token does not match stored credential");
            return Err(DomainError::token(class, TokenError::TokenMismatch));
        }

        debug!(class = %class, "token verified");
        Ok(claims.sub)
    }

    fn parse_subject_id(class: TokenClass, subject: &str) -> DomainResult<Uuid> {
        Uuid::parse_str(subject).map_err(|_| DomainError::token(class, TokenError::TokenInvalid))
    }

    // ---- generation -----------------------------------------------------

    /// Generates an access token. Self-contained; no record is written.
    pub async fn generate_access_token(&self, user_id: Uuid) -> DomainResult<String> {
        self.generate(TokenClass::Access, &user_id.to_string(), None)
            .await
    }

    /// Generates a refresh token for a (user, device) pair, replacing any
    /// existing record for that key.
    pub async fn generate_refresh_token(
        &self,
        user_id: Uuid,
        device: &str,
    ) -> DomainResult<String> {
        self.generate(TokenClass::Refresh, &user_id.to_string(), Some(device))
            .await
    }

    /// Generates an email-verification token keyed by the address.
    pub async fn generate_verify_email_token(&self, email: &str) -> DomainResult<String> {
        self.generate(TokenClass::VerifyEmail, email, None).await
    }

    /// Generates a password-recovery token for a user.
    pub async fn generate_recover_password_token(&self, user_id: Uuid) -> DomainResult<String> {
        self.generate(TokenClass::RecoverPassword, &user_id.to_string(), None)
            .await
    }

    // ---- verification ---------------------------------------------------

    /// Verifies an access token and resolves its subject in the identity
    /// store. An account that no longer exists makes the token invalid.
    pub async fn verify_access_token(&self, token: &str) -> DomainResult<Identity> {
        let class = TokenClass::Access;
        let claims: Claims = self
            .codec(class)
            .parse(token)
            .map_err(|source| DomainError::token(class, source))?;

        let user_id = Self::parse_subject_id(class, &claims.sub)?;
        self.identities
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::token(class, TokenError::TokenInvalid))
    }

    /// Verifies a refresh token for a device, returning the user id.
    pub async fn verify_refresh_token(&self, token: &str, device: &str) -> DomainResult<Uuid> {
        let subject = self
            .verify(TokenClass::Refresh, token, Some(device))
            .await?;
        Self::parse_subject_id(TokenClass::Refresh, &subject)
    }

    /// Verifies an email-verification token, returning the address.
    pub async fn verify_email_token(&self, token: &str) -> DomainResult<String> {
        self.verify(TokenClass::VerifyEmail, token, None).await
    }

    /// Verifies a password-recovery token, returning the user id.
    pub async fn verify_recover_password_token(&self, token: &str) -> DomainResult<Uuid> {
        let subject = self.verify(TokenClass::RecoverPassword, token, None).await?;
        Self::parse_subject_id(TokenClass::RecoverPassword, &subject)
    }

    // ---- deletion -------------------------------------------------------

    /// Single-device logout. Idempotent; returns whether a record existed.
    pub async fn delete_refresh_token(&self, user_id: Uuid, device: &str) -> DomainResult<bool> {
        self.credentials
            .delete(TokenClass::Refresh, &user_id.to_string(), Some(device))
            .await
    }

    /// All-device logout. Returns the number of records removed.
    pub async fn delete_all_refresh_tokens(&self, user_id: Uuid) -> DomainResult<usize> {
        self.credentials
            .delete_all_for_subject(TokenClass::Refresh, &user_id.to_string())
            .await
    }

    /// Removes the email-verification record for an address.
    pub async fn delete_verify_email_token(&self, email: &str) -> DomainResult<bool> {
        self.credentials
            .delete(TokenClass::VerifyEmail, email, None)
            .await
    }

    /// Removes the password-recovery record for a user.
    pub async fn delete_recover_password_token(&self, user_id: Uuid) -> DomainResult<bool> {
        self.credentials
            .delete(TokenClass::RecoverPassword, &user_id.to_string(), None)
            .await
    }

    // ---- sweep ----------------------------------------------------------

    /// Removes expired records across the three persisted classes
    /// concurrently, returning the total count removed.
    ///
    /// Safe to call repeatedly and concurrently with any other
    /// operation; a record swept between a caller's token decode and its
    /// store lookup surfaces as `TokenNotFound`, not an error here.
    pub async fn sweep_expired(&self) -> DomainResult<usize> {
        let now = Utc::now();
        let (refresh, verify_email, recover_password) = tokio::try_join!(
            self.credentials.delete_expired(TokenClass::Refresh, now),
            self.credentials.delete_expired(TokenClass::VerifyEmail, now),
            self.credentials
                .delete_expired(TokenClass::RecoverPassword, now),
        )?;

        let total = refresh + verify_email + recover_password;
        info!(
            refresh,
            verify_email, recover_password, "swept expired credential records"
        );
        Ok(total)
    }
}
