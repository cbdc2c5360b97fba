//! Domain error to HTTP response mapping.
//!
//! Authentication and token failures are collapsed into a single
//! unauthorized message per endpoint. Which check failed (bad signature,
//! expiry, unknown token, wrong class, deleted user) stays in the server
//! logs; handing it to the caller would let an attacker probe token and
//! account validity.

use actix_web::HttpResponse;
use tracing::{error, warn};

use ag_core::errors::{AuthError, DomainError};
use ag_shared::types::response::ApiResponse;

/// Translate a domain error, using `unauthorized_message` for every
/// credential or token failure.
pub fn handle_domain_error(err: DomainError, unauthorized_message: &str) -> HttpResponse {
    match err {
        DomainError::Storage { ref message } => {
            error!(error = message, "storage failure");
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("An internal error occurred"))
        }
        DomainError::Auth(AuthError::MissingToken) => HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error(AuthError::MissingToken.to_string())),
        other => {
            warn!(error = %other, "authentication failure");
            HttpResponse::Unauthorized().json(ApiResponse::<()>::error(unauthorized_message))
        }
    }
}

/// Translate request body validation failures
pub fn handle_validation_error(err: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ag_core::errors::TokenError;

    #[test]
    fn test_token_failures_are_normalized() {
        // Distinct internal causes, identical wire response.
        let expired = handle_domain_error(
            DomainError::Token(TokenError::Expired),
            "Invalid or expired refresh token",
        );
        let wrong_class = handle_domain_error(
            DomainError::Token(TokenError::WrongClass),
            "Invalid or expired refresh token",
        );

        assert_eq!(expired.status(), 401);
        assert_eq!(wrong_class.status(), 401);
    }

    #[test]
    fn test_missing_token_is_a_client_error() {
        let response = handle_domain_error(
            DomainError::Auth(AuthError::MissingToken),
            "Invalid or expired refresh token",
        );
        assert_eq!(response.status(), 400);
    }

    #[test]
    fn test_storage_failure_is_internal() {
        let response = handle_domain_error(
            DomainError::Storage {
                message: "connection reset".to_string(),
            },
            "Invalid credentials",
        );
        assert_eq!(response.status(), 500);
    }
}
