//! Application state and route wiring.

use actix_web::{error::InternalError, web, HttpResponse};

use ag_core::repositories::{RefreshTokenRepository, UserStore};
use ag_core::services::AuthService;
use ag_shared::types::response::ApiResponse;

use crate::routes::auth;

/// Shared application state, generic over the storage backends so tests can
/// wire in the in-memory mocks.
pub struct AppState<U, T>
where
    U: UserStore,
    T: RefreshTokenRepository,
{
    pub auth_service: AuthService<U, T>,
}

/// Register routes and request-level configuration on an actix app
pub fn configure_app<U, T>(cfg: &mut web::ServiceConfig, state: web::Data<AppState<U, T>>)
where
    U: UserStore + 'static,
    T: RefreshTokenRepository + 'static,
{
    cfg.app_data(state)
        .app_data(json_config())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login::login::<U, T>))
                .route("/refresh", web::post().to(auth::refresh::refresh::<U, T>))
                .route("/logout", web::post().to(auth::logout::logout::<U, T>))
                .route("/me", web::get().to(auth::me::me::<U, T>)),
        );
}

/// Malformed JSON bodies get the same envelope as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error(format!("Invalid request body: {err}")));
        InternalError::from_response(err, response).into()
    })
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "authgate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
