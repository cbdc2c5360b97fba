//! # AuthGate Shared
//!
//! Configuration types and the wire-level response envelope shared by the
//! server crates and the API client.

pub mod config;
pub mod types;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use types::response::ApiResponse;
