//! Configuration for the token codec.

use ag_shared::config::AuthConfig;

/// Signing secrets for the codec, one per token class.
///
/// There is intentionally no `Default`: a codec cannot exist without
/// explicitly configured secrets.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret used to sign and verify access tokens
    pub access_secret: String,
    /// Secret used to sign and verify refresh tokens
    pub refresh_secret: String,
}

impl TokenConfig {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        }
    }
}

impl From<&AuthConfig> for TokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_token_secret.clone(),
            refresh_secret: config.refresh_token_secret.clone(),
        }
    }
}
