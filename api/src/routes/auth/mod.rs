//! Authentication endpoints:
//! - `POST /auth/login`
//! - `POST /auth/refresh`
//! - `POST /auth/logout`
//! - `GET /auth/me`

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
