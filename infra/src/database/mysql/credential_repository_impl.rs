//! MySQL implementation of the CredentialRepository trait.
//!
//! Shadow records live in the `credential_records` table, keyed by the
//! composite primary key (class, subject, device). `upsert` relies on
//! MySQL's `INSERT ... ON DUPLICATE KEY UPDATE` so that replacing a
//! rotated-out record is a single atomic statement and no application
//! lock is needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::debug;

use tm_core::domain::entities::credential::{CredentialRecord, TokenClass};
use tm_core::errors::{DomainError, DomainResult};
use tm_core::repositories::CredentialRepository;

/// MySQL implementation of [`CredentialRepository`].
///
/// The `device` column is NOT NULL with an empty-string default, so the
/// composite primary key stays well-defined for deviceless classes; the
/// normalization to "" happens here and is reversed on the way out.
pub struct MySqlCredentialRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlCredentialRepository {
    /// Create a new MySQL credential repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Normalize the device key for storage: deviceless records use "".
    fn device_column(device: Option<&str>) -> &str {
        device.unwrap_or("")
    }

    /// Convert a database row to a [`CredentialRecord`] entity.
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<CredentialRecord> {
        let class_name: String = row.try_get("class").map_err(|e| DomainError::Internal {
            message: format!("failed to get class: {}", e),
        })?;
        let class = TokenClass::from_name(&class_name).ok_or_else(|| DomainError::Internal {
            message: format!("unknown token class in store: {}", class_name),
        })?;

        let device: String = row.try_get("device").map_err(|e| DomainError::Internal {
            message: format!("failed to get device: {}", e),
        })?;

        Ok(CredentialRecord {
            class,
            subject: row.try_get("subject").map_err(|e| DomainError::Internal {
                message: format!("failed to get subject: {}", e),
            })?,
            device: if device.is_empty() { None } else { Some(device) },
            cipher_text: row
                .try_get("cipher_text")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get cipher_text: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get expires_at: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get updated_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl CredentialRepository for MySqlCredentialRepository {
    async fn upsert(&self, record: CredentialRecord) -> DomainResult<()> {
        let query = r#"
            INSERT INTO credential_records (
                class, subject, device, cipher_text, expires_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                cipher_text = VALUES(cipher_text),
                expires_at = VALUES(expires_at),
                updated_at = VALUES(updated_at)
        "#;

        sqlx::query(query)
            .bind(record.class.name())
            .bind(&record.subject)
            .bind(record.device_key())
            .bind(&record.cipher_text)
            .bind(record.expires_at)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!("failed to upsert credential: {}", e))
            })?;

        debug!(
            class = %record.class,
            subject = %record.subject,
            "credential record upserted"
        );
        Ok(())
    }

    async fn find(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<Option<CredentialRecord>> {
        let query = r#"
            SELECT class, subject, device, cipher_text, expires_at, created_at, updated_at
            FROM credential_records
            WHERE class = ? AND subject = ? AND device = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(class.name())
            .bind(subject)
            .bind(Self::device_column(device))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!("failed to find credential: {}", e))
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(
        &self,
        class: TokenClass,
        subject: &str,
        device: Option<&str>,
    ) -> DomainResult<bool> {
        let query = r#"
            DELETE FROM credential_records
            WHERE class = ? AND subject = ? AND device = ?
        "#;

        let result = sqlx::query(query)
            .bind(class.name())
            .bind(subject)
            .bind(Self::device_column(device))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!("failed to delete credential: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_subject(
        &self,
        class: TokenClass,
        subject: &str,
    ) -> DomainResult<usize> {
        let query = r#"
            DELETE FROM credential_records
            WHERE class = ? AND subject = ?
        "#;

        let result = sqlx::query(query)
            .bind(class.name())
            .bind(subject)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!("failed to delete credentials: {}", e))
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, class: TokenClass, now: DateTime<Utc>) -> DomainResult<usize> {
        let query = r#"
            DELETE FROM credential_records
            WHERE class = ? AND expires_at < ?
        "#;

        let result = sqlx::query(query)
            .bind(class.name())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!("failed to sweep credentials: {}", e))
            })?;

        let removed = result.rows_affected() as usize;
        if removed > 0 {
            debug!(class = %class, removed, "expired credential records removed");
        }
        Ok(removed)
    }
}
