//! Session coordinator: token state, refresh coalescing, and retry-once.

use tokio::sync::Mutex;
use tracing::warn;

use crate::error::ClientError;
use crate::transport::{AuthOutcome, AuthTransport, UserProfile};

/// Per-session token state. Owned by the client instance; nothing here is
/// process-global.
#[derive(Debug, Default, Clone)]
struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// API client that manages its own token lifecycle.
///
/// Every authenticated call attaches the in-memory access token. When a
/// call comes back unauthorized, the client refreshes the pair and replays
/// the call exactly once. Concurrent unauthorized calls share one refresh:
/// the `refresh_gate` mutex admits a single winner, and the losers discover
/// on wake-up that the tokens already changed and reuse them instead of
/// rotating again (which would fail single-use enforcement server-side).
pub struct AuthClient<T: AuthTransport> {
    transport: T,
    session: Mutex<Session>,
    refresh_gate: Mutex<()>,
}

impl<T: AuthTransport> AuthClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: Mutex::new(Session::default()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Authenticate and store the issued token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let envelope = self.transport.login(email, password).await?;

        match envelope.data {
            Some(data) if envelope.success => {
                let mut session = self.session.lock().await;
                session.access_token = Some(data.access_token);
                session.refresh_token = Some(data.refresh_token);
                Ok(data.user)
            }
            _ => Err(ClientError::Api {
                message: envelope.error.unwrap_or_else(|| "Login failed".to_string()),
            }),
        }
    }

    /// Invalidate the session server-side and clear local state.
    ///
    /// Local state is cleared even when the server call fails; the user is
    /// logged out either way.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let refresh_token = {
            let session = self.session.lock().await;
            session.refresh_token.clone()
        };

        if let Some(token) = refresh_token {
            if let Err(err) = self.transport.logout(&token).await {
                warn!(error = %err, "logout request failed, clearing local session anyway");
            }
        }

        self.clear_session().await;
        Ok(())
    }

    /// Fetch the authenticated user's profile, refreshing the token pair
    /// once if the access token is rejected
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let access_token = {
            let session = self.session.lock().await;
            session.access_token.clone()
        };

        // Without an access token the first attempt would be pointless; go
        // straight to the refresh path.
        let access_token = match access_token {
            Some(token) => token,
            None => self.refresh_session(None).await?,
        };

        match self.transport.fetch_me(&access_token).await? {
            AuthOutcome::Ok(profile) => return Ok(profile),
            AuthOutcome::Unauthorized => {}
        }

        // One retry with a fresh token, never more.
        let fresh = self.refresh_session(Some(&access_token)).await?;
        match self.transport.fetch_me(&fresh).await? {
            AuthOutcome::Ok(profile) => Ok(profile),
            AuthOutcome::Unauthorized => Err(ClientError::Unauthorized),
        }
    }

    /// Current access token, if any
    pub async fn access_token(&self) -> Option<String> {
        self.session.lock().await.access_token.clone()
    }

    /// Current refresh token, if any
    pub async fn refresh_token(&self) -> Option<String> {
        self.session.lock().await.refresh_token.clone()
    }

    /// Rotate the token pair, coalescing concurrent attempts.
    ///
    /// `stale` is the access token the caller just saw rejected. Whoever
    /// wins the gate performs the rotation; everyone queued behind them
    /// finds the session's access token no longer matches their stale one
    /// and returns it without another server call.
    async fn refresh_session(&self, stale: Option<&str>) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;

        let refresh_token = {
            let session = self.session.lock().await;
            if let Some(current) = &session.access_token {
                if stale != Some(current.as_str()) {
                    return Ok(current.clone());
                }
            }
            session.refresh_token.clone()
        };

        let Some(refresh_token) = refresh_token else {
            self.clear_session().await;
            return Err(ClientError::SessionExpired);
        };

        match self.transport.refresh(&refresh_token).await {
            Ok(envelope) => match envelope.data {
                Some(data) if envelope.success => {
                    let mut session = self.session.lock().await;
                    session.access_token = Some(data.access_token.clone());
                    session.refresh_token = Some(data.refresh_token);
                    Ok(data.access_token)
                }
                _ => {
                    warn!(
                        error = envelope.error.as_deref().unwrap_or("unknown"),
                        "server rejected refresh token"
                    );
                    self.clear_session().await;
                    Err(ClientError::SessionExpired)
                }
            },
            Err(err) => {
                warn!(error = %err, "token refresh request failed");
                self.clear_session().await;
                Err(ClientError::SessionExpired)
            }
        }
    }

    async fn clear_session(&self) {
        let mut session = self.session.lock().await;
        *session = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::AuthData;
    use ag_shared::types::response::ApiResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    /// Scripted server: tracks the currently valid token pair and counts
    /// calls.
    struct StubTransport {
        valid_access: StdMutex<String>,
        valid_refresh: StdMutex<String>,
        generation: AtomicUsize,
        refresh_calls: AtomicUsize,
        me_calls: AtomicUsize,
        reject_all_access: AtomicBool,
        fail_refresh: AtomicBool,
    }

    impl StubTransport {
        fn new() -> Self {
            Self {
                valid_access: StdMutex::new("access-0".to_string()),
                valid_refresh: StdMutex::new("refresh-0".to_string()),
                generation: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
                me_calls: AtomicUsize::new(0),
                reject_all_access: AtomicBool::new(false),
                fail_refresh: AtomicBool::new(false),
            }
        }

        fn profile() -> UserProfile {
            UserProfile {
                id: "user-1".to_string(),
                email: "test@example.com".to_string(),
                name: "Test User".to_string(),
            }
        }

        fn auth_data(&self) -> AuthData {
            AuthData {
                access_token: self.valid_access.lock().unwrap().clone(),
                refresh_token: self.valid_refresh.lock().unwrap().clone(),
                user: Self::profile(),
            }
        }

        /// Invalidate the outstanding access token, as expiry would
        fn expire_access(&self) {
            *self.valid_access.lock().unwrap() = "server-side-rotated".to_string();
        }
    }

    #[async_trait]
    impl AuthTransport for StubTransport {
        async fn login(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<ApiResponse<AuthData>, ClientError> {
            Ok(ApiResponse::success(self.auth_data()))
        }

        async fn refresh(
            &self,
            refresh_token: &str,
        ) -> Result<ApiResponse<AuthData>, ClientError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_refresh.load(Ordering::SeqCst) {
                return Ok(ApiResponse::error("Invalid or expired refresh token"));
            }

            // Single use: only the current refresh token rotates.
            if refresh_token != *self.valid_refresh.lock().unwrap() {
                return Ok(ApiResponse::error("Invalid or expired refresh token"));
            }

            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *self.valid_access.lock().unwrap() = format!("access-{generation}");
            *self.valid_refresh.lock().unwrap() = format!("refresh-{generation}");
            Ok(ApiResponse::success(self.auth_data()))
        }

        async fn logout(&self, _refresh_token: &str) -> Result<(), ClientError> {
            Ok(())
        }

        async fn fetch_me(
            &self,
            access_token: &str,
        ) -> Result<AuthOutcome<UserProfile>, ClientError> {
            self.me_calls.fetch_add(1, Ordering::SeqCst);

            if self.reject_all_access.load(Ordering::SeqCst) {
                return Ok(AuthOutcome::Unauthorized);
            }
            if access_token == *self.valid_access.lock().unwrap() {
                Ok(AuthOutcome::Ok(Self::profile()))
            } else {
                Ok(AuthOutcome::Unauthorized)
            }
        }
    }

    async fn logged_in_client() -> (Arc<AuthClient<Arc<StubTransport>>>, Arc<StubTransport>) {
        let transport = Arc::new(StubTransport::new());
        let client = Arc::new(AuthClient::new(transport.clone()));
        client.login("test@example.com", "password123").await.unwrap();
        (client, transport)
    }

    #[tokio::test]
    async fn test_login_stores_tokens() {
        let (client, _) = logged_in_client().await;

        assert_eq!(client.access_token().await.as_deref(), Some("access-0"));
        assert_eq!(client.refresh_token().await.as_deref(), Some("refresh-0"));
    }

    #[tokio::test]
    async fn test_me_succeeds_without_refresh_when_token_valid() {
        let (client, transport) = logged_in_client().await;

        let profile = client.me().await.unwrap();

        assert_eq!(profile.email, "test@example.com");
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_access_token_triggers_refresh_and_retry() {
        let (client, transport) = logged_in_client().await;
        transport.expire_access();

        let profile = client.me().await.unwrap();

        assert_eq!(profile.email, "test@example.com");
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
        // Both tokens were rotated locally.
        assert_eq!(client.access_token().await.as_deref(), Some("access-1"));
        assert_eq!(client.refresh_token().await.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_concurrent_calls_coalesce_into_one_refresh() {
        let (client, transport) = logged_in_client().await;
        transport.expire_access();

        let mut handles = Vec::new();
        for _ in 0..5 {
            let client = client.clone();
            handles.push(tokio::spawn(async move { client.me().await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        // Five unauthorized calls, one rotation. A second rotation would
        // have failed anyway: the server-side record is single use.
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_session_and_signals_expiry() {
        let (client, transport) = logged_in_client().await;
        transport.expire_access();
        transport.fail_refresh.store(true, Ordering::SeqCst);

        let result = client.me().await;

        assert!(matches!(result.unwrap_err(), ClientError::SessionExpired));
        assert!(client.access_token().await.is_none());
        assert!(client.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn test_me_without_session_signals_expiry() {
        let transport = Arc::new(StubTransport::new());
        let client = AuthClient::new(transport);

        let result = client.me().await;
        assert!(matches!(result.unwrap_err(), ClientError::SessionExpired));
    }

    #[tokio::test]
    async fn test_retry_happens_exactly_once() {
        let (client, transport) = logged_in_client().await;
        // Every access token is rejected, even freshly rotated ones.
        transport.reject_all_access.store(true, Ordering::SeqCst);

        let result = client.me().await;

        assert!(matches!(result.unwrap_err(), ClientError::Unauthorized));
        assert_eq!(transport.me_calls.load(Ordering::SeqCst), 2);
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (client, _) = logged_in_client().await;

        client.logout().await.unwrap();

        assert!(client.access_token().await.is_none());
        assert!(client.refresh_token().await.is_none());
    }
}
