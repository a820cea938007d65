//! Client configuration

use std::time::Duration;

use super::reconnect::ReconnectPolicy;

/// Default bound on negotiate plus the WebSocket handshake
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the broadcast channel URL comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEndpoint {
    /// Ask the negotiate endpoint at this HTTP URL for the hub URL
    Negotiate(String),
    /// Connect to this WebSocket URL directly
    Direct(String),
}

/// Configuration for a hub session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: ChannelEndpoint,
    pub connect_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Discover the hub through a negotiate URL
    pub fn negotiate(url: impl Into<String>) -> Self {
        Self::with_endpoint(ChannelEndpoint::Negotiate(url.into()))
    }

    /// Connect straight to a hub WebSocket URL
    pub fn direct(url: impl Into<String>) -> Self {
        Self::with_endpoint(ChannelEndpoint::Direct(url.into()))
    }

    fn with_endpoint(endpoint: ChannelEndpoint) -> Self {
        Self {
            endpoint,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect: ReconnectPolicy::none(),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }
}
