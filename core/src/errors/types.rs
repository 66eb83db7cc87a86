//! Error type definitions for configuration, token, and cipher failures.
//!
//! Messages never include key material, signing secrets, or raw envelope
//! contents; the transport layer is expected to translate these variants
//! into protocol-level responses.

use thiserror::Error;

use crate::domain::entities::credential::TokenClass;

/// Startup-fatal configuration errors.
///
/// A missing cipher key or signing secret is detected when the services
/// are constructed, never at request time.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("encryption key is not configured")]
    MissingCipherKey,

    #[error("encryption key must be 32 bytes, hex encoded")]
    InvalidCipherKey,

    #[error("signing secret for {class} tokens is not configured")]
    MissingSecret { class: TokenClass },
}

/// Token validation and issuance errors.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The signed token's own expiry claim has passed.
    #[error("token expired")]
    TokenExpired,

    /// Bad signature, bad structure, or claims that do not add up.
    #[error("token invalid")]
    TokenInvalid,

    /// No credential record exists for the decoded key.
    #[error("no credential record for token")]
    TokenNotFound,

    /// The stored record decrypts to a different token than the one
    /// presented. This is the replay / stale-token guard: a rotated-out
    /// token decodes fine but never matches the current record.
    #[error("token does not match stored credential")]
    TokenMismatch,

    #[error("token generation failed")]
    TokenGenerationFailed,
}

/// Storage-layer decrypt failures from the cipher box.
///
/// The malformed/authentication distinction matters for diagnostics, but
/// both are non-retriable.
#[derive(Error, Debug)]
pub enum CipherError {
    /// Envelope does not split into exactly nonce:tag:ciphertext.
    #[error("encrypted envelope is malformed")]
    MalformedEnvelope,

    /// Authentication tag did not verify: tampering or wrong key.
    #[error("envelope authentication failed")]
    AuthenticationFailure,

    #[error("encryption failed")]
    EncryptionFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_token_error_messages() {
        assert_eq!(TokenError::TokenExpired.to_string(), "token expired");
        assert_eq!(
            TokenError::TokenMismatch.to_string(),
            "token does not match stored credential"
        );
    }

    #[test]
    fn test_config_error_names_class() {
        let err = ConfigError::MissingSecret {
            class: TokenClass::VerifyEmail,
        };
        assert!(err.to_string().contains("verify_email"));
    }

    #[test]
    fn test_domain_error_annotates_class() {
        let err = DomainError::token(TokenClass::Refresh, TokenError::TokenNotFound);
        let message = err.to_string();
        assert!(message.starts_with("refresh token error"));
        assert!(message.contains("no credential record"));
    }

    #[test]
    fn test_only_store_unavailable_is_retriable() {
        assert!(DomainError::store_unavailable("connection reset").is_retriable());
        assert!(!DomainError::token(TokenClass::Access, TokenError::TokenExpired).is_retriable());
        assert!(
            !DomainError::cipher(TokenClass::Refresh, CipherError::AuthenticationFailure)
                .is_retriable()
        );
    }

    #[test]
    fn test_cipher_error_does_not_leak_envelope() {
        let err = CipherError::AuthenticationFailure;
        let message = err.to_string();
        assert!(!message.contains(':'));
        assert_eq!(message, "envelope authentication failed");
    }
}
