//! MySQL implementation of the IdentityRepository trait.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tm_core::domain::entities::identity::Identity;
use tm_core::errors::{DomainError, DomainResult};
use tm_core::repositories::IdentityRepository;

/// MySQL implementation of [`IdentityRepository`].
///
/// Read-only view over the `users` table; account management writes to
/// it elsewhere.
pub struct MySqlIdentityRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlIdentityRepository {
    /// Create a new MySQL identity repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an [`Identity`] entity.
    fn row_to_identity(row: &sqlx::mysql::MySqlRow) -> DomainResult<Identity> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("failed to get id: {}", e),
        })?;

        Ok(Identity {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("invalid user UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("failed to get email: {}", e),
            })?,
            email_verified: row
                .try_get("email_verified")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get email_verified: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl IdentityRepository for MySqlIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Identity>> {
        let query = r#"
            SELECT id, email, email_verified
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!("failed to find identity: {}", e))
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_identity(&row)?)),
            None => Ok(None),
        }
    }
}
