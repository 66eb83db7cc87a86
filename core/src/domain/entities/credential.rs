//! Credential entities: token classes and their persisted shadow records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four classes of bearer token issued by the service.
///
/// Each class carries its own signing secret and time-to-live through
/// [`TokenServiceConfig`](crate::services::token::TokenServiceConfig).
/// Access tokens are self-contained and never persisted; the other three
/// keep one encrypted shadow record per natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Access,
    Refresh,
    VerifyEmail,
    RecoverPassword,
}

impl TokenClass {
    /// The three classes that keep a shadow record in the store.
    pub const PERSISTED: [TokenClass; 3] = [
        TokenClass::Refresh,
        TokenClass::VerifyEmail,
        TokenClass::RecoverPassword,
    ];

    /// Stable lowercase name, used in logs, error messages, and as the
    /// class discriminator column in the store.
    pub fn name(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
            TokenClass::VerifyEmail => "verify_email",
            TokenClass::RecoverPassword => "recover_password",
        }
    }

    /// Inverse of [`name`](Self::name), for store implementations that
    /// persist the class as its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "access" => Some(TokenClass::Access),
            "refresh" => Some(TokenClass::Refresh),
            "verify_email" => Some(TokenClass::VerifyEmail),
            "recover_password" => Some(TokenClass::RecoverPassword),
            _ => None,
        }
    }

    /// Whether tokens of this class have a shadow record in the store.
    pub fn is_persisted(&self) -> bool {
        !matches!(self, TokenClass::Access)
    }

    /// Whether records of this class are additionally keyed by device.
    pub fn is_device_keyed(&self) -> bool {
        matches!(self, TokenClass::Refresh)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Persisted shadow of an issued long-lived token.
///
/// The natural key is (class, subject, device); at most one record exists
/// per key, enforced by the store's atomic upsert rather than by any
/// application-level locking. `cipher_text` holds the authenticated
/// encryption envelope of the signed token, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Which persisted token class this record belongs to.
    pub class: TokenClass,

    /// Identity reference: a user id for refresh/reset records, or an
    /// email for email-keyed verification records.
    pub subject: String,

    /// Opaque client/device discriminator; present only for refresh
    /// records, where the same subject holds one record per device.
    pub device: Option<String>,

    /// AEAD envelope of the signed token.
    pub cipher_text: String,

    /// Record expiry, slightly longer than the token's own `exp` claim.
    /// The sweep collects records past it; verification treats them as
    /// already gone.
    pub expires_at: DateTime<Utc>,

    /// Audit timestamp, not used for logic.
    pub created_at: DateTime<Utc>,

    /// Audit timestamp, not used for logic.
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Creates a new record for the given key.
    pub fn new(
        class: TokenClass,
        subject: impl Into<String>,
        device: Option<String>,
        cipher_text: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            class,
            subject: subject.into(),
            device,
            cipher_text,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Device component of the natural key, normalized to "" for
    /// deviceless classes.
    pub fn device_key(&self) -> &str {
        self.device.as_deref().unwrap_or("")
    }

    /// Whether the record is logically dead. The sweep removes expired
    /// records eventually; readers must not treat them as live meanwhile.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
