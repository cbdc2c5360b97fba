use actix_web::{web, HttpResponse};
use validator::Validate;

use ag_core::repositories::{RefreshTokenRepository, UserStore};
use ag_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_error};

/// Handler for POST /auth/login
///
/// Exchanges email and password for an access/refresh token pair. A wrong
/// password and an unknown email produce the same response.
pub async fn login<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserStore + 'static,
    T: RefreshTokenRepository + 'static,
{
    if let Err(err) = request.validate() {
        return handle_validation_error(err);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(payload) => HttpResponse::Ok().json(
            ApiResponse::success(AuthResponse::from(payload)).with_message("Login successful"),
        ),
        Err(err) => handle_domain_error(err, "Invalid credentials"),
    }
}
