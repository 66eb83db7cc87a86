//! Identity repository trait for the external user-identity store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainResult;

/// Read-only lookup into the identity store.
///
/// The credential core consults this when verifying access tokens and
/// never writes to it; account management lives elsewhere.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find an identity by its unique id.
    ///
    /// Returns `Ok(None)` when no account exists for the id.
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Identity>>;
}
