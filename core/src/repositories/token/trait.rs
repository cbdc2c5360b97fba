//! Refresh token repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Persistence contract for refresh token records.
///
/// Each operation is atomic at the single-record level. Rotation is not a
/// store concern: the lifecycle manager expresses it as delete-then-insert,
/// relying on the unique `token` column to keep the race between two
/// concurrent redemptions of the same token down to a single winner.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new record.
    ///
    /// Fails if a record with the same token string already exists.
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Look up a record by exact token string
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Delete a record by id.
    ///
    /// Returns `true` if a record was deleted, `false` if none existed. The
    /// caller uses this to detect losing a concurrent rotation race.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete a record by token string; `false` if none existed
    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Delete every record whose expiry is before `cutoff`, returning the
    /// number removed
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
