//! MySQL repository implementations.

mod token_repository_impl;
mod user_store_impl;

pub use token_repository_impl::MySqlRefreshTokenRepository;
pub use user_store_impl::{hash_password, MySqlUserStore};
