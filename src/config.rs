//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Origin the board is served from during development
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3001";

/// Default port, same as a local functions host
pub const DEFAULT_PORT: u16 = 7071;

/// Default hub broadcast buffer (frames per subscriber before lagging)
pub const DEFAULT_HUB_CAPACITY: usize = 1024;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid allowed origin {0:?}")]
    InvalidOrigin(String),

    #[error("hub url must start with ws:// or wss://, got {0:?}")]
    InvalidHubUrl(String),

    #[error("hub capacity must be greater than zero")]
    ZeroCapacity,
}

/// Configuration for the Hotseat server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to
    pub bind_addr: SocketAddr,
    /// Directory holding `events.jsonl`
    pub data_dir: PathBuf,
    /// The single origin allowed by CORS
    pub allowed_origin: String,
    /// Hub URL handed out by negotiate; derived from the request `Host` when unset
    pub public_hub_url: Option<String>,
    /// Broadcast buffer size of the hub
    pub hub_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            data_dir: PathBuf::from("data"),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            public_hub_url: None,
            hub_capacity: DEFAULT_HUB_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = origin.into();
        self
    }

    pub fn with_public_hub_url(mut self, url: impl Into<String>) -> Self {
        self.public_hub_url = Some(url.into());
        self
    }

    pub fn with_hub_capacity(mut self, capacity: usize) -> Self {
        self.hub_capacity = capacity;
        self
    }

    /// The allowed origin as a header value
    pub fn origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.allowed_origin)
            .map_err(|_| ConfigError::InvalidOrigin(self.allowed_origin.clone()))
    }

    /// Check the configuration before starting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origin.is_empty() {
            return Err(ConfigError::InvalidOrigin(self.allowed_origin.clone()));
        }
        self.origin_header()?;

        if let Some(url) = &self.public_hub_url {
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(ConfigError::InvalidHubUrl(url.clone()));
            }
        }

        if self.hub_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.allowed_origin, "http://localhost:3001");
        assert!(config.public_hub_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_hub_url() {
        let config = ServerConfig::default().with_public_hub_url("http://example.com/api/hub");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidHubUrl(_))));
    }

    #[test]
    fn test_rejects_bad_origin() {
        let config = ServerConfig::default().with_allowed_origin("http://bad\norigin");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidOrigin(_))));

        let config = ServerConfig::default().with_allowed_origin("");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidOrigin(_))));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = ServerConfig::default().with_hub_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCapacity)));
    }
}
