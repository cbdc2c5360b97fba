//! Token signing configuration.

use serde::{Deserialize, Serialize};

use super::{require_var, ConfigError};

/// Signing secrets for the two token classes.
///
/// Access and refresh tokens are signed with distinct secrets so a token of
/// one class can never verify as the other. There is no fallback default:
/// startup fails unless both secrets are configured explicitly.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret for signing access tokens (`ACCESS_TOKEN_SECRET`)
    pub access_token_secret: String,

    /// Secret for signing refresh tokens (`REFRESH_TOKEN_SECRET`)
    pub refresh_token_secret: String,
}

impl AuthConfig {
    /// Load and validate secrets from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token_secret = require_var("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = require_var("REFRESH_TOKEN_SECRET")?;

        let config = Self {
            access_token_secret,
            refresh_token_secret,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations where one leaked secret compromises both classes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::InvalidVar {
                name: "REFRESH_TOKEN_SECRET".to_string(),
                reason: "must differ from ACCESS_TOKEN_SECRET".to_string(),
            });
        }
        Ok(())
    }
}
