//! # AuthGate Core
//!
//! Core business logic and domain layer for the AuthGate backend. This crate
//! contains the token lifecycle manager, domain entities, repository
//! interfaces, and error types. It knows nothing about HTTP or SQL; those
//! live in the `api` and `infra` crates.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use errors::{AuthError, DomainError, DomainResult, TokenError};
