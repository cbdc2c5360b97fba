//! User lookup and credential verification interface.

mod mock;
mod r#trait;

pub use mock::MockUserStore;
pub use r#trait::UserStore;
