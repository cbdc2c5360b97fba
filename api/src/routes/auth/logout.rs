use actix_web::{web, HttpResponse};

use ag_core::repositories::{RefreshTokenRepository, UserStore};
use ag_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;

/// Handler for POST /auth/logout
///
/// Deletes the presented refresh token's record. Logging out a token that
/// is already gone still succeeds; only an absent token is an error.
pub async fn logout<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserStore + 'static,
    T: RefreshTokenRepository + 'static,
{
    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("Logout successful")),
        Err(err) => handle_domain_error(err, "Invalid or expired refresh token"),
    }
}
