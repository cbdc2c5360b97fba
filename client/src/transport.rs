//! Wire transport for the AuthGate API.
//!
//! The coordinator talks to the server through the [`AuthTransport`] trait;
//! [`HttpTransport`] is the reqwest-backed production implementation and
//! tests substitute a scripted one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use ag_shared::types::response::ApiResponse;

use crate::error::ClientError;

/// Public user profile as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Token pair plus user summary from login and refresh responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

/// Outcome of an authenticated call: either the payload or an unauthorized
/// signal that the coordinator may answer with a token refresh
#[derive(Debug)]
pub enum AuthOutcome<T> {
    Ok(T),
    Unauthorized,
}

/// Low-level API operations
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthData>, ClientError>;

    async fn refresh(&self, refresh_token: &str) -> Result<ApiResponse<AuthData>, ClientError>;

    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError>;

    async fn fetch_me(&self, access_token: &str)
        -> Result<AuthOutcome<UserProfile>, ClientError>;
}

#[async_trait]
impl<T: AuthTransport + ?Sized> AuthTransport for std::sync::Arc<T> {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthData>, ClientError> {
        (**self).login(email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ApiResponse<AuthData>, ClientError> {
        (**self).refresh(refresh_token).await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError> {
        (**self).logout(refresh_token).await
    }

    async fn fetch_me(
        &self,
        access_token: &str,
    ) -> Result<AuthOutcome<UserProfile>, ClientError> {
        (**self).fetch_me(access_token).await
    }
}

/// reqwest-backed transport
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AuthTransport for HttpTransport {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthData>, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await?;

        Ok(response.json().await?)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ApiResponse<AuthData>, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&json!({"refreshToken": refresh_token}))
            .send()
            .await?;

        Ok(response.json().await?)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), ClientError> {
        self.http
            .post(self.url("/auth/logout"))
            .json(&json!({"refreshToken": refresh_token}))
            .send()
            .await?;

        Ok(())
    }

    async fn fetch_me(
        &self,
        access_token: &str,
    ) -> Result<AuthOutcome<UserProfile>, ClientError> {
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(AuthOutcome::Unauthorized);
        }

        let envelope: ApiResponse<UserProfile> = response.json().await?;
        match envelope.data {
            Some(profile) if envelope.success => Ok(AuthOutcome::Ok(profile)),
            _ => Err(ClientError::Api {
                message: envelope
                    .error
                    .unwrap_or_else(|| "Failed to fetch user".to_string()),
            }),
        }
    }
}
