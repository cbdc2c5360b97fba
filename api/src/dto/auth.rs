//! Authentication DTOs.
//!
//! Field names are camelCase on the wire; that contract is stable
//! regardless of what the server internals look like.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ag_core::domain::value_objects::{AuthPayload, UserSummary};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<UserSummary> for UserDto {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            email: summary.email,
            name: summary.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

impl From<AuthPayload> for AuthResponse {
    fn from(payload: AuthPayload) -> Self {
        Self {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            user: UserDto::from(payload.user),
        }
    }
}
