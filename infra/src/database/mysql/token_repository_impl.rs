//! MySQL implementation of the RefreshTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ag_core::domain::entities::token::RefreshTokenRecord;
use ag_core::errors::DomainError;
use ag_core::repositories::RefreshTokenRepository;

/// Refresh token persistence backed by the `refresh_tokens` table.
///
/// The table carries a unique index on `token` and a cascading foreign key
/// on `user_id`, so deleting a user also removes their tokens.
pub struct MySqlRefreshTokenRepository {
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let id: String = row.try_get("id").map_err(DomainError::storage)?;
        let user_id: String = row.try_get("user_id").map_err(DomainError::storage)?;

        Ok(RefreshTokenRecord {
            id: Uuid::parse_str(&id).map_err(DomainError::storage)?,
            user_id: Uuid::parse_str(&user_id).map_err(DomainError::storage)?,
            token: row.try_get("token").map_err(DomainError::storage)?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(DomainError::storage)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(DomainError::storage)?,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (id, user_id, token, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.token)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    DomainError::Storage {
                        message: "duplicate refresh token".to_string(),
                    }
                } else {
                    DomainError::storage(e)
                }
            })?;

        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, token, expires_at, created_at
            FROM refresh_tokens
            WHERE token = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        Ok(result.rows_affected())
    }
}
