//! In-memory implementation of UserStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserStore;

/// Mock user store.
///
/// Password verification is plain string comparison against the stored
/// "hash", which keeps test setup independent of any hashing crate. Clones
/// share the same underlying map.
#[derive(Clone)]
pub struct MockUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a user to the store
    pub async fn add(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Remove a user, simulating account deletion
    pub async fn remove(&self, id: Uuid) {
        self.users.write().await.remove(&id);
    }
}

impl Default for MockUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn verify_password(
        &self,
        candidate: &str,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        Ok(candidate == password_hash)
    }
}
