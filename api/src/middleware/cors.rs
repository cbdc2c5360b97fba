//! CORS configuration for browser clients.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use std::env;

/// Creates the CORS middleware.
///
/// Origins come from the comma-separated `ALLOWED_ORIGINS` variable; without
/// it the policy is permissive, which suits local development where the web
/// client runs on its own dev-server port.
pub fn create_cors() -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600);

    match env::var("ALLOWED_ORIGINS") {
        Ok(origins) => origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
        Err(_) => cors.allow_any_origin(),
    }
}
