use actix_web::{web, HttpRequest, HttpResponse};

use ag_core::repositories::{RefreshTokenRepository, UserStore};
use ag_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::UserDto;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::extract_bearer_token;

/// Handler for GET /auth/me
///
/// Returns the authenticated user's summary. Requires a Bearer access
/// token; any verification failure answers with the same unauthorized
/// response.
pub async fn me<U, T>(req: HttpRequest, state: web::Data<AppState<U, T>>) -> HttpResponse
where
    U: UserStore + 'static,
    T: RefreshTokenRepository + 'static,
{
    let token = match extract_bearer_token(&req) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized()
                .json(ApiResponse::<()>::error("Missing or invalid Authorization header"));
        }
    };

    match state.auth_service.validate_access_token(&token).await {
        Ok(summary) => HttpResponse::Ok().json(
            ApiResponse::success(UserDto::from(summary)).with_message("User retrieved successfully"),
        ),
        Err(err) => handle_domain_error(err, "Invalid or expired access token"),
    }
}
