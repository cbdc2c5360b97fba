//! Value objects returned by the core services.

pub mod auth_payload;

pub use auth_payload::{AuthPayload, UserSummary};
