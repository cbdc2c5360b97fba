//! Unit tests for the authentication service

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{RefreshTokenRecord, TokenClass};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::token::MockRefreshTokenRepository;
use crate::repositories::user::MockUserStore;
use crate::repositories::RefreshTokenRepository;
use crate::services::auth::AuthService;
use crate::services::token::{TokenCodec, TokenConfig};

const ACCESS_SECRET: &str = "access-test-secret";
const REFRESH_SECRET: &str = "refresh-test-secret";

fn codec() -> TokenCodec {
    TokenCodec::new(&TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET))
}

fn test_user() -> User {
    // The mock store compares passwords with string equality, so the
    // "hash" is just the password itself.
    User::new(
        "test@example.com".to_string(),
        "Test User".to_string(),
        "password123".to_string(),
    )
}

async fn service_with_user(
    user: User,
) -> (
    AuthService<MockUserStore, MockRefreshTokenRepository>,
    MockUserStore,
    MockRefreshTokenRepository,
) {
    let users = MockUserStore::new();
    users.add(user).await;
    let tokens = MockRefreshTokenRepository::new();
    let service = AuthService::new(users.clone(), tokens.clone(), codec());
    (service, users, tokens)
}

#[tokio::test]
async fn test_login_returns_verifiable_pair() {
    let user = test_user();
    let user_id = user.id;
    let (service, _, _) = service_with_user(user).await;

    let payload = service.login("test@example.com", "password123").await.unwrap();

    let verifier = codec();
    let access = verifier
        .verify(&payload.access_token, TokenClass::Access)
        .unwrap();
    let refresh = verifier
        .verify(&payload.refresh_token, TokenClass::Refresh)
        .unwrap();

    assert_eq!(access.subject_id().unwrap(), user_id);
    assert_eq!(refresh.subject_id().unwrap(), user_id);
    assert_eq!(payload.user.id, user_id);
    assert_eq!(payload.user.email, "test@example.com");
    assert_eq!(payload.user.name, "Test User");
}

#[tokio::test]
async fn test_login_persists_refresh_record() {
    let (service, _, tokens) = service_with_user(test_user()).await;

    let payload = service.login("test@example.com", "password123").await.unwrap();

    let record = tokens
        .find_by_token(&payload.refresh_token)
        .await
        .unwrap()
        .expect("refresh token record missing");
    assert_eq!(record.user_id, payload.user.id);
    assert!(!record.is_expired());
}

#[tokio::test]
async fn test_login_unknown_email_and_wrong_password_are_indistinguishable() {
    let (service, _, _) = service_with_user(test_user()).await;

    let unknown = service
        .login("nobody@example.com", "password123")
        .await
        .unwrap_err();
    let wrong = service
        .login("test@example.com", "wrong-password")
        .await
        .unwrap_err();

    assert!(matches!(
        unknown,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        wrong,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let (service, _, tokens) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    let rotated = service.refresh(&payload.refresh_token).await.unwrap();

    assert_ne!(rotated.refresh_token, payload.refresh_token);
    assert_eq!(rotated.user.id, payload.user.id);

    // The consumed record is gone; its replacement is stored.
    assert!(tokens
        .find_by_token(&payload.refresh_token)
        .await
        .unwrap()
        .is_none());
    assert!(tokens
        .find_by_token(&rotated.refresh_token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_refresh_is_single_use() {
    let (service, _, _) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    service.refresh(&payload.refresh_token).await.unwrap();
    let second = service.refresh(&payload.refresh_token).await.unwrap_err();

    assert!(matches!(
        second,
        DomainError::Token(TokenError::InvalidOrExpired)
    ));
}

#[tokio::test]
async fn test_refresh_rejects_unknown_token() {
    let user = test_user();
    let user_id = user.id;
    let (service, _, _) = service_with_user(user).await;

    // Well-formed and correctly signed, but never persisted.
    let token = codec()
        .sign(user_id, "test@example.com", TokenClass::Refresh)
        .unwrap();
    let result = service.refresh(&token).await.unwrap_err();

    assert!(matches!(
        result,
        DomainError::Token(TokenError::InvalidOrExpired)
    ));
}

#[tokio::test]
async fn test_refresh_rejects_past_stored_expiry() {
    let user = test_user();
    let user_id = user.id;
    let (service, _, tokens) = service_with_user(user).await;

    // The signed payload is still valid for days, but the stored record
    // says otherwise; the stored expiry wins.
    let token = codec()
        .sign(user_id, "test@example.com", TokenClass::Refresh)
        .unwrap();
    tokens
        .insert(RefreshTokenRecord::new(
            user_id,
            token.clone(),
            Utc::now() - Duration::hours(1),
        ))
        .await
        .unwrap();

    let result = service.refresh(&token).await.unwrap_err();
    assert!(matches!(
        result,
        DomainError::Token(TokenError::InvalidOrExpired)
    ));
}

#[tokio::test]
async fn test_refresh_rejects_garbage() {
    let (service, _, _) = service_with_user(test_user()).await;
    let result = service.refresh("not-a-token").await.unwrap_err();
    assert!(matches!(
        result,
        DomainError::Token(TokenError::InvalidOrExpired)
    ));
}

#[tokio::test]
async fn test_concurrent_refresh_has_single_winner() {
    let (service, _, _) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    let (first, second) = tokio::join!(
        service.refresh(&payload.refresh_token),
        service.refresh(&payload.refresh_token)
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent refresh may win");
}

#[tokio::test]
async fn test_logout_then_refresh_fails() {
    let (service, _, _) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    service.logout(&payload.refresh_token).await.unwrap();
    let result = service.refresh(&payload.refresh_token).await.unwrap_err();

    assert!(matches!(
        result,
        DomainError::Token(TokenError::InvalidOrExpired)
    ));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (service, _, _) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    service.logout(&payload.refresh_token).await.unwrap();
    // Second logout of the same (now unknown) token is still a success.
    service.logout(&payload.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_logout_requires_token() {
    let (service, _, _) = service_with_user(test_user()).await;

    let result = service.logout("").await.unwrap_err();
    assert!(matches!(result, DomainError::Auth(AuthError::MissingToken)));

    let result = service.logout("   ").await.unwrap_err();
    assert!(matches!(result, DomainError::Auth(AuthError::MissingToken)));
}

#[tokio::test]
async fn test_validate_access_token() {
    let (service, _, _) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    let summary = service
        .validate_access_token(&payload.access_token)
        .await
        .unwrap();

    assert_eq!(summary.id, payload.user.id);
    assert_eq!(summary.email, "test@example.com");
    assert_eq!(summary.name, "Test User");
}

#[tokio::test]
async fn test_validate_rejects_refresh_class_token() {
    let user = test_user();
    let user_id = user.id;
    let (service, _, _) = service_with_user(user).await;

    let refresh = codec()
        .sign(user_id, "test@example.com", TokenClass::Refresh)
        .unwrap();
    let result = service.validate_access_token(&refresh).await.unwrap_err();

    assert!(matches!(result, DomainError::Token(_)));
}

#[tokio::test]
async fn test_validate_rejects_deleted_user() {
    let (service, users, _) = service_with_user(test_user()).await;
    let payload = service.login("test@example.com", "password123").await.unwrap();

    users.remove(payload.user.id).await;

    let result = service
        .validate_access_token(&payload.access_token)
        .await
        .unwrap_err();
    assert!(matches!(result, DomainError::Auth(AuthError::UserNotFound)));
}

#[tokio::test]
async fn test_issuance_sweeps_expired_records() {
    let user = test_user();
    let user_id = user.id;
    let (service, _, tokens) = service_with_user(user).await;

    // One live record and a pile of expired ones.
    let live = codec()
        .sign(user_id, "test@example.com", TokenClass::Refresh)
        .unwrap();
    tokens
        .insert(RefreshTokenRecord::new(
            user_id,
            live.clone(),
            Utc::now() + Duration::days(3),
        ))
        .await
        .unwrap();
    for i in 0..4 {
        tokens
            .insert(RefreshTokenRecord::new(
                user_id,
                format!("expired-token-{i}"),
                Utc::now() - Duration::days(1),
            ))
            .await
            .unwrap();
    }
    assert_eq!(tokens.count().await, 5);

    service.login("test@example.com", "password123").await.unwrap();

    // The four expired records are swept; the live one and the freshly
    // issued one remain.
    assert_eq!(tokens.count().await, 2);
    assert!(tokens.find_by_token(&live).await.unwrap().is_some());
}

/// Token repository that can be told to fail inserts, for exercising the
/// fail-closed rotation path.
#[derive(Clone)]
struct FlakyTokenRepository {
    inner: MockRefreshTokenRepository,
    fail_inserts: Arc<AtomicBool>,
}

impl FlakyTokenRepository {
    fn new() -> Self {
        Self {
            inner: MockRefreshTokenRepository::new(),
            fail_inserts: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for FlakyTokenRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::Storage {
                message: "simulated insert failure".to_string(),
            });
        }
        self.inner.insert(record).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.inner.find_by_token(token).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        self.inner.delete_by_id(id).await
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        self.inner.delete_by_token(token).await
    }

    async fn delete_expired_before(
        &self,
        cutoff: chrono::DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.inner.delete_expired_before(cutoff).await
    }
}

#[tokio::test]
async fn test_rotation_insert_failure_fails_closed() {
    let users = MockUserStore::new();
    users.add(test_user()).await;
    let tokens = FlakyTokenRepository::new();
    let service = AuthService::new(users, tokens.clone(), codec());

    let payload = service.login("test@example.com", "password123").await.unwrap();

    tokens.fail_inserts.store(true, Ordering::SeqCst);
    let result = service.refresh(&payload.refresh_token).await.unwrap_err();

    // The refresh fails as an invalid-token outcome and the old record is
    // already gone: the subject must log in again.
    assert!(matches!(
        result,
        DomainError::Token(TokenError::InvalidOrExpired)
    ));
    assert!(tokens
        .find_by_token(&payload.refresh_token)
        .await
        .unwrap()
        .is_none());
}
