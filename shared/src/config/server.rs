//! HTTP server configuration.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Bind address for the API server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen host (`SERVER_HOST`, default 127.0.0.1)
    pub host: String,

    /// Listen port (`SERVER_PORT`, default 8080)
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("SERVER_PORT")
            .ok()
            .map(|v| {
                v.parse::<u16>().map_err(|_| ConfigError::InvalidVar {
                    name: "SERVER_PORT".to_string(),
                    reason: format!("not a valid port: {v}"),
                })
            })
            .transpose()?
            .unwrap_or(8080);

        Ok(Self { host, port })
    }

    /// Address string suitable for `HttpServer::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_format() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
        };
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}
