//! User store trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Capability the core needs from user storage: lookups plus password
/// verification against the stored hash. Account creation and mutation are
/// deliberately absent; the lifecycle manager only reads users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Verify a candidate password against a stored hash
    async fn verify_password(
        &self,
        candidate: &str,
        password_hash: &str,
    ) -> Result<bool, DomainError>;
}
