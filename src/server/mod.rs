//! Server module
//!
//! Binds the listener, runs the accept loop and handles shutdown signals.

mod connection;
mod listener;
mod signal;

// Rust does not allow `loop` as a module name, so it is mapped to server_loop
#[path = "loop.rs"]
mod server_loop;

pub use signal::{start_signal_handler, ShutdownSignal};

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerSettings;
use crate::error::ServeError;

/// A bound static asset server, ready to accept connections
pub struct Server {
    listener: TcpListener,
    settings: Arc<ServerSettings>,
}

impl Server {
    /// Bind the configured address
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(settings: ServerSettings) -> Result<Self, ServeError> {
        let listener = listener::create_listener(settings.addr)?;
        Ok(Self {
            listener,
            settings: Arc::new(settings),
        })
    }

    /// Address actually bound (differs from the configured one for port 0)
    pub fn local_addr(&self) -> Result<SocketAddr, ServeError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Serve until `shutdown` is triggered
    pub async fn run(self, shutdown: Arc<ShutdownSignal>) {
        server_loop::start_server_loop(self.listener, self.settings, shutdown).await;
    }
}
