/**
 * Server Configuration
 *
 * The store server reads its listen port from `SERVER_PORT`. A missing or
 * unparsable value falls back to the default port with a warning rather than
 * refusing to start.
 */

use std::net::SocketAddr;

/// Port used when `SERVER_PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

/// Store server configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        match std::env::var("SERVER_PORT") {
            Ok(value) => Self::from_port_str(&value),
            Err(_) => Self::default(),
        }
    }

    fn from_port_str(value: &str) -> Self {
        match value.trim().parse::<u16>() {
            Ok(port) => Self { port },
            Err(_) => {
                tracing::warn!(
                    "Invalid SERVER_PORT '{}', using {}",
                    value,
                    DEFAULT_PORT
                );
                Self::default()
            }
        }
    }

    /// Address the server binds, on every interface
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
