//! Credential repository trait defining the interface for shadow-record
//! persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::credential::{CredentialRecord, TokenClass};
use crate::errors::DomainResult;

/// Repository trait for [`CredentialRecord`] persistence.
///
/// The natural key for every operation is (class, subject, device), with
/// device meaningful only for refresh records. The "one live record per
/// key" invariant rests entirely on `upsert` being an atomic
/// conflict-resolving write; implementations backed by a store without
/// such a primitive must add their own per-key mutual exclusion.
///
/// Transient I/O failures must surface as
/// [`DomainError::StoreUnavailable`](crate::errors::DomainError), which is
/// the only error class a caller may retry.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Atomically create or replace the record for its natural key.
    ///
    /// When a record already exists for (class, subject, device), its
    /// `cipher_text` and `expires_at` are replaced and `updated_at` is
    /// refreshed; otherwise a new record is created. This single write is
    /// what retires a rotated-out token.
    async fn upsert(&self, record: CredentialRecord) -> DomainResult<()>;

    /// Find the record for a natural key.
    ///
    /// Returns `Ok(None)` when no record exists, including when the sweep
    /// removed it between a caller's token decode and this lookup.
    async fn find(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<Option<CredentialRecord>>;

    /// Delete the record for a natural key.
    ///
    /// Idempotent: deleting an absent record returns `Ok(false)`.
    async fn delete(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<bool>;

    /// Delete every record of a class held by a subject, across devices.
    ///
    /// Returns the number of records removed. Used for all-device logout;
    /// for deviceless classes at most one record can match.
    async fn delete_all_for_subject(
        &self,
        class: TokenClass,
        subject: &str,
    ) -> DomainResult<usize>;

    /// Delete every record of a class with `expires_at` strictly before
    /// `now`, returning the count removed. Sweep primitive; safe to run
    /// concurrently with any other operation.
    async fn delete_expired(&self, class: TokenClass, now: DateTime<Utc>) -> DomainResult<usize>;
}
