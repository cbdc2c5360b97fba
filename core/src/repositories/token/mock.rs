//! In-memory implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

/// Mock repository keyed by token string, mirroring the unique column of the
/// real table.
///
/// Clones share the same underlying map, so a test can keep a handle for
/// assertions after handing one to the service under test.
#[derive(Clone)]
pub struct MockRefreshTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records, for test assertions
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MockRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.token) {
            return Err(DomainError::Storage {
                message: "duplicate refresh token".to_string(),
            });
        }

        records.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(token).cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let key = records
            .values()
            .find(|r| r.id == id)
            .map(|r| r.token.clone());

        match key {
            Some(key) => {
                records.remove(&key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(token).is_some())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.expires_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
