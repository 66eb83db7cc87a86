//! Configuration for the token service.

use chrono::Duration;

use crate::domain::entities::credential::TokenClass;
use crate::errors::ConfigError;

/// Signing secret and time-to-live for one token class.
#[derive(Debug, Clone)]
pub struct ClassConfig {
    /// HS256 signing secret, distinct per class.
    pub secret: String,
    /// Lifetime of the signed token in seconds.
    pub ttl_seconds: i64,
}

impl ClassConfig {
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    /// TTL as a chrono duration.
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds)
    }
}

/// Configuration for the token service: one [`ClassConfig`] per token
/// class plus the grace added to shadow-record expiry.
///
/// Secrets are supplied by the deployment and injected here explicitly;
/// the core never reads the environment. A missing secret is a
/// startup-fatal configuration error, surfaced by [`validate`]
/// (Self::validate) when the service is constructed.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    pub access: ClassConfig,
    pub refresh: ClassConfig,
    pub verify_email: ClassConfig,
    pub recover_password: ClassConfig,

    /// Extra lifetime the shadow record gets beyond the signed token's
    /// own expiry. The record only has to outlive the token; the sweep
    /// picks it up afterwards.
    pub record_grace_seconds: i64,
}

impl TokenServiceConfig {
    /// Per-class configuration lookup.
    pub fn class(&self, class: TokenClass) -> &ClassConfig {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
            TokenClass::VerifyEmail => &self.verify_email,
            TokenClass::RecoverPassword => &self.recover_password,
        }
    }

    /// Grace added to shadow-record expiry.
    pub fn record_grace(&self) -> Duration {
        Duration::seconds(self.record_grace_seconds)
    }

    /// Rejects empty signing secrets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for class in [
            TokenClass::Access,
            TokenClass::Refresh,
            TokenClass::VerifyEmail,
            TokenClass::RecoverPassword,
        ] {
            if self.class(class).secret.trim().is_empty() {
                return Err(ConfigError::MissingSecret { class });
            }
        }
        Ok(())
    }
}
