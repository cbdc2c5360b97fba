//! Main authentication service implementation

use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::entities::token::{RefreshTokenRecord, TokenClass};
use crate::domain::entities::user::User;
use crate::domain::value_objects::auth_payload::{AuthPayload, UserSummary};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{RefreshTokenRepository, UserStore};
use crate::services::token::TokenCodec;

/// Orchestrates the token lifecycle over a user store, a refresh token
/// repository, and the token codec.
///
/// The service is stateless; concurrent calls share nothing but the
/// repositories. Two concurrent refreshes of the same token race on the
/// delete half of rotation and exactly one wins.
pub struct AuthService<U, T>
where
    U: UserStore,
    T: RefreshTokenRepository,
{
    users: U,
    tokens: T,
    codec: TokenCodec,
}

impl<U, T> AuthService<U, T>
where
    U: UserStore,
    T: RefreshTokenRepository,
{
    pub fn new(users: U, tokens: T, codec: TokenCodec) -> Self {
        Self {
            users,
            tokens,
            codec,
        }
    }

    /// Authenticate with email and password, minting a fresh token pair.
    ///
    /// An unknown email and a wrong password both produce
    /// `AuthError::InvalidCredentials`, so the response does not reveal
    /// whether the account exists.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid = self
            .users
            .verify_password(password, &user.password_hash)
            .await?;
        if !password_valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.issue_tokens(&user).await
    }

    /// Redeem a refresh token for a new token pair, rotating the stored
    /// record.
    ///
    /// Single use: the presented token's record is deleted before its
    /// replacement is inserted, so redeeming the same token twice fails the
    /// second time. A storage failure inside the rotation pair also fails
    /// the attempt (the subject re-authenticates rather than keeping a
    /// half-rotated token alive).
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, DomainError> {
        self.codec
            .verify(refresh_token, TokenClass::Refresh)
            .map_err(|_| TokenError::InvalidOrExpired)?;

        let record = self
            .tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or(TokenError::InvalidOrExpired)?;

        // The stored expiry is checked on top of the signed one; a tampered
        // or clock-skewed record must not extend a token's life.
        if record.is_expired() {
            return Err(TokenError::InvalidOrExpired.into());
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(TokenError::InvalidOrExpired)?;

        let access_token = self.codec.sign(user.id, &user.email, TokenClass::Access)?;
        let new_refresh_token = self.codec.sign(user.id, &user.email, TokenClass::Refresh)?;

        let deleted = self.tokens.delete_by_id(record.id).await.map_err(|err| {
            error!(error = %err, "rotation failed deleting consumed refresh token");
            DomainError::Token(TokenError::InvalidOrExpired)
        })?;
        if !deleted {
            // A concurrent refresh already consumed this record.
            return Err(TokenError::InvalidOrExpired.into());
        }

        self.persist_refresh_token(user.id, &new_refresh_token)
            .await
            .map_err(|err| {
                error!(error = %err, "rotation failed persisting replacement refresh token");
                DomainError::Token(TokenError::InvalidOrExpired)
            })?;

        Ok(AuthPayload {
            access_token,
            refresh_token: new_refresh_token,
            user: UserSummary::from(&user),
        })
    }

    /// Invalidate a refresh token.
    ///
    /// Logging out an already-deleted or unknown token succeeds; only an
    /// absent token argument is an error.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), DomainError> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        self.tokens.delete_by_token(refresh_token).await?;
        Ok(())
    }

    /// Verify an access token and resolve its subject.
    ///
    /// Access tokens are not individually revocable, so the subject lookup
    /// is the only guard against acting for a user deleted after issuance.
    pub async fn validate_access_token(&self, token: &str) -> Result<UserSummary, DomainError> {
        let claims = self.codec.verify(token, TokenClass::Access)?;
        let user_id: Uuid = claims
            .subject_id()
            .map_err(|_| TokenError::InvalidClaims)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserSummary::from(&user))
    }

    /// Mint and persist a token pair for an authenticated user
    async fn issue_tokens(&self, user: &User) -> Result<AuthPayload, DomainError> {
        let access_token = self.codec.sign(user.id, &user.email, TokenClass::Access)?;
        let refresh_token = self.codec.sign(user.id, &user.email, TokenClass::Refresh)?;

        self.persist_refresh_token(user.id, &refresh_token).await?;

        Ok(AuthPayload {
            access_token,
            refresh_token,
            user: UserSummary::from(user),
        })
    }

    /// Store a refresh token record and opportunistically sweep expired
    /// ones.
    ///
    /// The record's expiry comes from the token's own payload. The sweep is
    /// best-effort: a failed sweep never fails the issuance that triggered
    /// it.
    async fn persist_refresh_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError> {
        let expires_at = self.codec.decode_expiry(token)?;
        let record = RefreshTokenRecord::new(user_id, token.to_string(), expires_at);
        self.tokens.insert(record).await?;

        if let Err(err) = self.tokens.delete_expired_before(Utc::now()).await {
            warn!(error = %err, "failed to sweep expired refresh tokens");
        }

        Ok(())
    }
}
