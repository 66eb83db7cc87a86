//! Mock implementation of CredentialRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::credential::{CredentialRecord, TokenClass};
use crate::errors::{DomainError, DomainResult};

use super::r#trait::CredentialRepository;

type RecordKey = (TokenClass, String, String);

/// In-memory credential repository for testing.
///
/// Keyed map insertion stands in for the store's atomic upsert, which is
/// exactly the semantics the service relies on. Clones share state, so
/// tests can keep a handle after moving one into a service.
#[derive(Clone)]
pub struct MockCredentialRepository {
    records: Arc<RwLock<HashMap<RecordKey, CredentialRecord>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl MockCredentialRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            fail_writes: Arc::new(RwLock::new(false)),
        }
    }

    fn key(class: TokenClass, subject: &str, device: Option<&str>) -> RecordKey {
        (class, subject.to_string(), device.unwrap_or("").to_string())
    }

    /// Make subsequent writes fail with `StoreUnavailable`, simulating a
    /// transient outage.
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    /// Number of records currently held, across all classes.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MockCredentialRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn upsert(&self, record: CredentialRecord) -> DomainResult<()> {
        if *self.fail_writes.read().await {
            return Err(DomainError::store_unavailable("simulated outage"));
        }

        let key = Self::key(record.class, &record.subject, record.device.as_deref());
        let mut records = self.records.write().await;
        match records.entry(key) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.cipher_text = record.cipher_text;
                existing.expires_at = record.expires_at;
                existing.updated_at = Utc::now();
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(record);
            }
        }
        Ok(())
    }

    async fn find(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<Option<CredentialRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&Self::key(class, subject, device)).cloned())
    }

    async fn delete(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<bool> {
        let mut records = self.records.write().await;
        Ok(records.remove(&Self::key(class, subject, device)).is_some())
    }

    async fn delete_all_for_subject(
        &self,
        class: TokenClass,
        subject: &str,
    ) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|(c, s, _), _| !(*c == class && s == subject));
        Ok(before - records.len())
    }

    async fn delete_expired(&self, class: TokenClass, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|(c, _, _), record| *c != class || record.expires_at >= now);
        Ok(before - records.len())
    }
}
