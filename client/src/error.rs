//! Client-side error types.

use thiserror::Error;

/// Errors surfaced by the API client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope
    #[error("API error: {message}")]
    Api { message: String },

    /// A request stayed unauthorized even after a fresh token; the caller
    /// should not retry further
    #[error("Request unauthorized after token refresh")]
    Unauthorized,

    /// The session cannot be recovered; all local tokens have been cleared
    /// and the user must log in again
    #[error("Session expired, login required")]
    SessionExpired,
}
