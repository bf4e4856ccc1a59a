//! Error types
//!
//! Startup and runtime failures that end the process. Per-request failures never
//! reach this type; they are answered with an HTTP status instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    /// The positional port argument is not a valid `u16`
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// Another process already holds the configured port
    #[error("Port {port} is already in use")]
    AddrInUse { port: u16 },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cannot resolve root directory '{}': {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to initialize logger: {0}")]
    Logger(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ServeError {
    /// Process exit status for this error
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidPort(_) | Self::AddrInUse { .. } => 1,
            _ => 2,
        }
    }
}
