//! Mock implementation of IdentityRepository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainResult;

use super::r#trait::IdentityRepository;

/// In-memory identity store for testing. Clones share state.
#[derive(Clone)]
pub struct MockIdentityRepository {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl MockIdentityRepository {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, identity: Identity) {
        self.identities.write().await.insert(identity.id, identity);
    }
}

impl Default for MockIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Identity>> {
        let identities = self.identities.read().await;
        Ok(identities.get(&id).cloned())
    }
}
