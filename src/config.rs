//! Configuration for TwinKV
//!
//! Centralized configuration with sensible defaults.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::error::{KvError, Result};

/// Largest payload a single UDP datagram can carry over IPv4
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Configuration shared by the stream and datagram servers
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // -------------------------------------------------------------------------
    // Listen Configuration
    // -------------------------------------------------------------------------
    /// Interface to bind
    pub host: String,

    /// Port to bind (0 picks an ephemeral port)
    pub port: u16,

    // -------------------------------------------------------------------------
    // Stream Configuration
    // -------------------------------------------------------------------------
    /// Max concurrent client connections (0 = unbounded)
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Datagram Configuration
    // -------------------------------------------------------------------------
    /// Receive buffer size; longer datagrams are truncated by the OS
    pub datagram_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            datagram_buffer_size: MAX_DATAGRAM_SIZE,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Resolve `host:port` into a bindable address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let spec = format!("{}:{}", self.host, self.port);
        spec.to_socket_addrs()
            .map_err(|e| KvError::Config(format!("Invalid listen address {}: {}", spec, e)))?
            .next()
            .ok_or_else(|| KvError::Config(format!("No address resolved for {}", spec)))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Builder for ServerConfig
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the interface to bind
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port to bind
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the datagram receive buffer size (clamped to 1..=65507)
    pub fn datagram_buffer_size(mut self, size: usize) -> Self {
        self.config.datagram_buffer_size = size.clamp(1, MAX_DATAGRAM_SIZE);
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

/// Configuration for the console clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long to wait for a server response (milliseconds, 0 = forever)
    pub response_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            response_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    pub fn response_timeout(&self) -> Option<Duration> {
        (self.response_timeout_ms > 0).then(|| Duration::from_millis(self.response_timeout_ms))
    }
}
