//! Identity entity returned by the external identity store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal view of a user account, looked up when verifying access
/// tokens. This core never writes identities; the identity store is an
/// external collaborator reached through
/// [`IdentityRepository`](crate::repositories::IdentityRepository).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier for the account.
    pub id: Uuid,

    /// Primary email address.
    pub email: String,

    /// Whether the email address has been verified.
    pub email_verified: bool,
}

impl Identity {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            email_verified: false,
        }
    }
}
