//! JWT encoding and verification.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenClass};
use crate::errors::{DomainError, TokenError};

use super::config::TokenConfig;

/// Signs and verifies tokens of both classes.
///
/// Each class has its own key pair, so a refresh token presented where an
/// access token is expected fails signature verification before the class
/// tag is even looked at. The codec is also the single source of truth for
/// token expiry: the persisted record's expiry is decoded from the token
/// rather than recomputed by storage.
pub struct TokenCodec {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            access_encoding_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Produce a signed token bound to the given subject, expiring after the
    /// class TTL
    pub fn sign(
        &self,
        user_id: Uuid,
        email: &str,
        class: TokenClass,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(user_id, email, class);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.encoding_key(class),
        )
        .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    /// Verify signature, expiry, and class tag
    pub fn verify(&self, token: &str, expected: TokenClass) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, self.decoding_key(expected), &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidSignature,
            })?;

        if data.claims.class != expected {
            return Err(DomainError::Token(TokenError::WrongClass));
        }

        Ok(data.claims)
    }

    /// Extract the embedded expiry without verifying signature or expiry.
    ///
    /// Used only at issuance, on tokens this codec just signed, to populate
    /// the persisted record's expiry field.
    pub fn decode_expiry(&self, token: &str) -> Result<DateTime<Utc>, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;

        Utc.timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or(DomainError::Token(TokenError::InvalidClaims))
    }

    fn encoding_key(&self, class: TokenClass) -> &EncodingKey {
        match class {
            TokenClass::Access => &self.access_encoding_key,
            TokenClass::Refresh => &self.refresh_encoding_key,
        }
    }

    fn decoding_key(&self, class: TokenClass) -> &DecodingKey {
        match class {
            TokenClass::Access => &self.access_decoding_key,
            TokenClass::Refresh => &self.refresh_decoding_key,
        }
    }
}
