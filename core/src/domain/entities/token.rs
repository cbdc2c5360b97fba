//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Discriminator embedded in every token payload.
///
/// Access and refresh tokens are also signed with distinct secrets, so the
/// tag is a second line of defense rather than the only one. It is checked
/// as a typed variant in the codec, never by string comparison at call
/// sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    /// Lifetime of a token of this class, measured from issuance
    pub fn ttl(&self) -> Duration {
        match self {
            TokenClass::Access => Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            TokenClass::Refresh => Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        }
    }
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Principal identifier (email)
    pub email: String,

    /// Token class tag, serialized as `"access"` / `"refresh"`
    #[serde(rename = "type")]
    pub class: TokenClass,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a token of the given class, expiring after the
    /// class TTL
    pub fn new(user_id: Uuid, email: &str, class: TokenClass) -> Self {
        let now = Utc::now();
        let expiry = now + class.ttl();

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            class,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Gets the user ID from the claims
    pub fn subject_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Refresh token record persisted in the database.
///
/// Records are never updated in place: rotation deletes the old record and
/// inserts a fresh one, so a consumed token can never be redeemed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// The signed refresh token itself; unique across all records
    pub token: String,

    /// Timestamp when the token expires, decoded from the signed payload
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a new record for a freshly issued token.
    ///
    /// `expires_at` comes from the token's own signed payload; storage never
    /// computes an expiry of its own.
    pub fn new(user_id: Uuid, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Checks if the stored expiry has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
