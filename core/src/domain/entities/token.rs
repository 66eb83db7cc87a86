//! Token entities: JWT claims and the rotated token pair.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for the JWT payload.
///
/// Claims are deliberately minimal: a subject identifier plus, for
/// refresh tokens, the device discriminator embedded redundantly as
/// defense in depth alongside the store lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id or email, depending on the token class.
    pub sub: String,

    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,

    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,

    /// Unique token id. Guarantees two tokens for the same subject never
    /// serialize identically, even when issued within the same second.
    pub jti: String,

    /// Device discriminator, refresh tokens only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Claims {
    /// Creates claims expiring `ttl` from now.
    pub fn new(subject: &str, device: Option<&str>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            device: device.map(str::to_string),
        }
    }

    /// Whether the embedded expiry has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Access + refresh token pair returned by rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token (plaintext, never persisted).
    pub access_token: String,

    /// Signed refresh token (plaintext; only its sealed form is stored).
    pub refresh_token: String,

    /// Access token expiry in seconds.
    pub access_expires_in: i64,

    /// Refresh token expiry in seconds.
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with the configured per-class TTLs.
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
