//! Server configuration
//!
//! Bind address from the command line or environment, plus channel sizes.

use std::env;

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Environment variable consulted when no address argument is given
pub const ADDR_ENV_VAR: &str = "ROOM_CHAT_ADDR";

/// Channel buffer size for server commands
pub const DEFAULT_COMMAND_BUFFER: usize = 256;

/// Per-connection outbound buffer size
pub const DEFAULT_OUTBOUND_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub addr: String,
    /// Capacity of the hub command channel
    pub command_buffer: usize,
    /// Capacity of each connection's outbound channel
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            command_buffer: DEFAULT_COMMAND_BUFFER,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl ServerConfig {
    /// Build from process arguments and environment
    ///
    /// The first argument wins over `ROOM_CHAT_ADDR`, which wins over the default.
    pub fn from_env() -> Self {
        Self::resolve(env::args().nth(1), env::var(ADDR_ENV_VAR).ok())
    }

    fn resolve(arg: Option<String>, env_addr: Option<String>) -> Self {
        let addr = arg
            .or(env_addr)
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());

        Self {
            addr,
            ..Self::default()
        }
    }
}
