//! # AuthGate Infrastructure
//!
//! Concrete implementations of the core repository interfaces: MySQL
//! persistence via SQLx and bcrypt password verification.

pub mod database;

use thiserror::Error;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub use database::connection::DatabasePool;
pub use database::mysql::{hash_password, MySqlRefreshTokenRepository, MySqlUserStore};
