//! # AuthGate Client
//!
//! Session-aware API client for the AuthGate wire contract. The coordinator
//! keeps the access token in memory, attaches it to every authenticated
//! call, and on an unauthorized response refreshes the token pair exactly
//! once per call, coalescing concurrent refresh attempts into a single
//! request so only one rotation hits the server.

mod coordinator;
mod error;
mod transport;

pub use coordinator::AuthClient;
pub use error::ClientError;
pub use transport::{AuthData, AuthOutcome, AuthTransport, HttpTransport, UserProfile};
