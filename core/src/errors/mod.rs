//! Domain-specific error types.
//!
//! The variants keep internal failure causes distinct (expired vs. wrong
//! class vs. unknown token); the HTTP boundary is responsible for collapsing
//! them into a uniform unauthorized response so callers cannot probe which
//! check failed.

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email and wrong password map to this same variant so the two
    /// cases are indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Refresh token is required")]
    MissingToken,

    #[error("User not found")]
    UserNotFound,
}

/// Token errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Unexpected token class")]
    WrongClass,

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpired,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Storage failure: {message}")]
    Storage { message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Construct a storage failure from any persistence-layer error
    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::Storage {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_one_message() {
        // Whether the email is unknown or the password is wrong, the caller
        // sees the exact same error.
        let unknown_email = DomainError::from(AuthError::InvalidCredentials);
        let wrong_password = DomainError::from(AuthError::InvalidCredentials);
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    }

    #[test]
    fn test_storage_constructor() {
        let err = DomainError::storage("connection reset");
        assert!(err.to_string().contains("connection reset"));
    }
}
