//! Bearer token extraction for protected endpoints.

use actix_web::{http::header::AUTHORIZATION, HttpRequest};

/// Extracts the Bearer token from the Authorization header
pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}
