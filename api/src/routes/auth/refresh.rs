use actix_web::{web, HttpResponse};

use ag_core::repositories::{RefreshTokenRepository, UserStore};
use ag_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;

/// Handler for POST /auth/refresh
///
/// Redeems a refresh token for a new pair. The presented token is consumed
/// in the process; redeeming it again fails.
pub async fn refresh<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserStore + 'static,
    T: RefreshTokenRepository + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(payload) => HttpResponse::Ok().json(
            ApiResponse::success(AuthResponse::from(payload))
                .with_message("Token refreshed successfully"),
        ),
        Err(err) => handle_domain_error(err, "Invalid or expired refresh token"),
    }
}
