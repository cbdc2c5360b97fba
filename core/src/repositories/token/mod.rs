//! Refresh token persistence interface.

mod mock;
mod r#trait;

pub use mock::MockRefreshTokenRepository;
pub use r#trait::RefreshTokenRepository;
