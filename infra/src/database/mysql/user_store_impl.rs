//! MySQL implementation of the UserStore trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::warn;
use uuid::Uuid;

use ag_core::domain::entities::user::User;
use ag_core::errors::DomainError;
use ag_core::repositories::UserStore;

/// bcrypt cost factor for newly created accounts
pub const BCRYPT_COST: u32 = 10;

/// User lookups and bcrypt credential verification backed by the `users`
/// table.
pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(DomainError::storage)?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(DomainError::storage)?,
            email: row.try_get("email").map_err(DomainError::storage)?,
            name: row.try_get("name").map_err(DomainError::storage)?,
            password_hash: row
                .try_get("password_hash")
                .map_err(DomainError::storage)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(DomainError::storage)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(DomainError::storage)?,
        })
    }

    /// Insert a new user row. Used by the seed binary; the core never
    /// creates users.
    pub async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (id, email, name, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::storage)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn verify_password(
        &self,
        candidate: &str,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        // bcrypt is CPU-bound; keep it off the async workers.
        let candidate = candidate.to_string();
        let hash = password_hash.to_string();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash))
            .await
            .map_err(DomainError::storage)?;

        match outcome {
            Ok(valid) => Ok(valid),
            Err(err) => {
                // A stored hash bcrypt cannot parse can never match.
                warn!(error = %err, "stored password hash is not a valid bcrypt hash");
                Ok(false)
            }
        }
    }
}

/// Hash a plaintext password for storage
pub fn hash_password(password: &str) -> Result<String, DomainError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(DomainError::storage)
}
