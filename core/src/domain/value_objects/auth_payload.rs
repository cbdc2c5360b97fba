//! Result of a successful login or refresh.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::User;

/// Public view of a user, safe to return to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Token pair handed to a freshly authenticated caller.
///
/// Ephemeral: the access token lives only in the client's memory and the
/// refresh token's persistent counterpart is the stored record, not this
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_summary_excludes_password_hash() {
        let user = User::new(
            "test@example.com".to_string(),
            "Test User".to_string(),
            "$2b$10$secret-hash".to_string(),
        );
        let summary = UserSummary::from(&user);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("test@example.com"));
    }
}
