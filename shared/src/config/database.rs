//! Database connection configuration.

use serde::{Deserialize, Serialize};

use super::{require_var, ConfigError};

/// MySQL connection pool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection URL (`DATABASE_URL`)
    pub url: String,

    /// Maximum pool size (`DATABASE_MAX_CONNECTIONS`, default 10)
    pub max_connections: u32,

    /// Seconds to wait when acquiring a connection (`DATABASE_CONNECT_TIMEOUT`, default 30)
    pub connect_timeout: u64,
}

impl DatabaseConfig {
    /// Load from the environment; `DATABASE_URL` is required
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = require_var("DATABASE_URL")?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .map(|v| {
                v.parse::<u32>().map_err(|_| ConfigError::InvalidVar {
                    name: "DATABASE_MAX_CONNECTIONS".to_string(),
                    reason: format!("not a number: {v}"),
                })
            })
            .transpose()?
            .unwrap_or(10);

        let connect_timeout = std::env::var("DATABASE_CONNECT_TIMEOUT")
            .ok()
            .map(|v| {
                v.parse::<u64>().map_err(|_| ConfigError::InvalidVar {
                    name: "DATABASE_CONNECT_TIMEOUT".to_string(),
                    reason: format!("not a number: {v}"),
                })
            })
            .transpose()?
            .unwrap_or(30);

        Ok(Self {
            url,
            max_connections,
            connect_timeout,
        })
    }
}
